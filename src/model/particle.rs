use nalgebra::{Point2, Point3};

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ParticleID(pub u64);

/// A short-lived particle (a "meteor") owned by someone else. The scene reads
/// these, but only ever changes them by handing back [ParticleEffect]s.
#[derive(Debug, Clone)]
pub struct TransientParticle {
    pub id: ParticleID,
    /// Pixels.
    pub position: Point2<f64>,
    /// Diameter, in pixels.
    pub size: f64,
    /// Between 0 (dead) and 1 (fresh).
    pub life: f64,
    pub color: Point3<f32>,
}

impl TransientParticle {
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    pub fn apply(&mut self, effect: &ParticleEffect) {
        debug_assert_eq!(self.id, effect.particle_id);
        self.life = nalgebra::clamp(self.life + effect.life_delta, 0.0, 1.0);
    }
}

/// A change the scene wants made to a particle it doesn't own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleEffect {
    pub particle_id: ParticleID,
    pub life_delta: f64,
}

/// Whoever owns the particles. `particles` may return `None` if the source
/// isn't available (yet); the scene treats that as an empty set.
pub trait ParticleSource {
    fn particles(&self) -> Option<&[TransientParticle]>;

    fn apply_effects(&mut self, effects: &[ParticleEffect]);
}

impl ParticleSource for Vec<TransientParticle> {
    fn particles(&self) -> Option<&[TransientParticle]> {
        Some(self.as_slice())
    }

    fn apply_effects(&mut self, effects: &[ParticleEffect]) {
        for effect in effects {
            if let Some(particle) = self.iter_mut().find(|p| p.id == effect.particle_id) {
                particle.apply(effect);
            }
        }
    }
}
