use std::f64::consts::PI;

use nalgebra::{Point2, Point3, Vector2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::{ParticleEffect, ParticleID, ParticleSource, TransientParticle};
use crate::scene::Viewport;

const SPAWN_CHANCE: f64 = 0.05;
const MAX_METEORS: usize = 12;
const FADE_PER_FRAME: f64 = 0.004;

/// A stand-in particle owner for the viewer: meteors streak in from the top
/// edge and burn out. The scene only ever sees them through
/// [ParticleSource].
pub struct MeteorShower {
    rng: StdRng,
    next_id: u64,
    particles: Vec<TransientParticle>,
    // Parallel to `particles`
    velocities: Vec<Vector2<f64>>,
}

impl MeteorShower {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            next_id: 0,
            particles: Vec::new(),
            velocities: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn velocity(&self, index: usize) -> Option<Vector2<f64>> {
        self.velocities.get(index).copied()
    }

    pub fn step(&mut self, viewport: &Viewport) {
        for (particle, velocity) in self.particles.iter_mut().zip(self.velocities.iter()) {
            particle.position += *velocity;
            particle.life = (particle.life - FADE_PER_FRAME).max(0.0);
        }
        self.retain(|p| p.is_alive() && on_screen(&p.position, viewport));

        if viewport.has_area()
            && self.particles.len() < MAX_METEORS
            && self.rng.random_bool(SPAWN_CHANCE)
        {
            self.spawn(viewport);
        }
    }

    pub fn spawn(&mut self, viewport: &Viewport) {
        let angle = self.rng.random_range(PI / 6.0..=5.0 * PI / 6.0);
        let speed = self.rng.random_range(2.0..=6.0);
        let particle = TransientParticle {
            id: ParticleID(self.next_id),
            position: Point2::new(self.rng.random_range(0.0..=viewport.width), 0.0),
            size: self.rng.random_range(4.0..=12.0),
            life: 1.0,
            color: Point3::new(1.0, self.rng.random_range(0.6..=0.95), 0.4),
        };
        self.next_id += 1;

        self.particles.push(particle);
        // Screen y grows downwards
        self.velocities.push(Vector2::new(angle.cos(), angle.sin()) * speed);
    }

    fn retain(&mut self, keep: impl Fn(&TransientParticle) -> bool) {
        let mut i = 0;
        while i < self.particles.len() {
            if keep(&self.particles[i]) {
                i += 1;
            } else {
                self.particles.swap_remove(i);
                self.velocities.swap_remove(i);
            }
        }
    }
}

fn on_screen(p: &Point2<f64>, viewport: &Viewport) -> bool {
    (0.0..=viewport.width).contains(&p.x) && (0.0..=viewport.height).contains(&p.y)
}

impl ParticleSource for MeteorShower {
    fn particles(&self) -> Option<&[TransientParticle]> {
        Some(self.particles.as_slice())
    }

    fn apply_effects(&mut self, effects: &[ParticleEffect]) {
        self.particles.apply_effects(effects);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 400.0,
        height: 300.0,
    };

    #[test]
    fn test_spawned_meteors_head_down() {
        let mut shower = MeteorShower::new(1);
        for _ in 0..5 {
            shower.spawn(&VIEWPORT);
        }
        assert_eq!(shower.len(), 5);
        for i in 0..5 {
            assert!(shower.velocity(i).unwrap().y > 0.0);
        }
    }

    #[test]
    fn test_meteors_leave_or_burn_out() {
        let mut shower = MeteorShower::new(2);
        shower.spawn(&VIEWPORT);
        shower.spawn(&VIEWPORT);
        shower.particles[0].life = FADE_PER_FRAME / 2.0;
        shower.particles[1].position = Point2::new(-50.0, 100.0);

        // A zero viewport also keeps anything new from spawning
        shower.step(&Viewport {
            width: 0.0,
            height: 0.0,
        });
        assert!(shower.is_empty());
        assert_eq!(shower.velocities.len(), 0);
    }

    #[test]
    fn test_effects_kill_meteors() {
        let mut shower = MeteorShower::new(3);
        shower.spawn(&VIEWPORT);
        let id = shower.particles[0].id;
        let hit = ParticleEffect {
            particle_id: id,
            life_delta: -0.5,
        };
        shower.apply_effects(&[hit, hit]);
        assert_eq!(shower.particles[0].life, 0.0);

        // Dead ones are cleared on the next step
        shower.step(&Viewport {
            width: 0.0,
            height: 0.0,
        });
        assert!(shower.is_empty());
    }

    #[test]
    fn test_non_finite_viewport_spawns_nothing() {
        let mut shower = MeteorShower::new(4);
        for _ in 0..500 {
            shower.step(&Viewport::new(f64::INFINITY, f64::NAN));
        }
        assert!(shower.is_empty());
    }
}
