use crate::config::CollisionConfig;
use crate::model::{Body, CollisionEvent, ParticleEffect, TransientParticle};

#[derive(Debug, Default)]
pub struct CollisionOutcome {
    pub events: Vec<CollisionEvent>,
    /// Changes for the particle owner to apply; we never touch its particles.
    pub effects: Vec<ParticleEffect>,
}

/// Checks every body against every particle the owner still holds. An
/// overlapping pair yields an event on every frame it stays overlapping,
/// even once the particle's life is spent; there's no debounce.
pub fn detect_collisions(
    bodies: &mut [Body],
    particles: Option<&[TransientParticle]>,
    config: &CollisionConfig,
    frame: u64,
) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();
    let particles = particles.unwrap_or(&[]);

    for body in bodies.iter_mut() {
        for particle in particles {
            let distance = nalgebra::distance(&body.screen_position(), &particle.position);
            let threshold = body.size() / 2.0 + particle.size / 2.0;
            if distance >= threshold {
                continue;
            }

            outcome.events.push(CollisionEvent {
                body_id: body.id,
                particle_id: particle.id,
                position: nalgebra::center(&body.screen_position(), &particle.position),
                body_color: body.info.color,
                particle_color: particle.color,
                intensity: particle.size.min(body.size()) / 10.0,
                age: 0,
            });
            outcome.effects.push(ParticleEffect {
                particle_id: particle.id,
                life_delta: -config.life_damage,
            });

            body.raise_glow(config.glow);
            body.mark_collision(frame);
        }
    }

    outcome
}
