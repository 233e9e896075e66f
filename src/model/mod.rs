mod body;
mod events;
mod particle;

pub use body::{Body, BodyID, BodyInfo, BodyParams, Direction, OrbitElements, Oscillator};
pub use events::{CollisionEvent, CollisionQueue};
pub use particle::{ParticleEffect, ParticleID, ParticleSource, TransientParticle};
