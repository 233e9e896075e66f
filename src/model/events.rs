use nalgebra::{Point2, Point3};

use super::body::BodyID;
use super::particle::ParticleID;

/// A flash where a particle hit a body. Colors are copied so the event
/// outlives whatever produced it.
#[derive(Debug, Clone)]
pub struct CollisionEvent {
    pub body_id: BodyID,
    pub particle_id: ParticleID,
    pub position: Point2<f64>,
    pub body_color: Point3<f32>,
    pub particle_color: Point3<f32>,
    pub intensity: f64,
    /// Frames since the event was created.
    pub age: u32,
}

#[derive(Debug, Clone)]
pub struct CollisionQueue {
    // Invariant: after age_and_prune, every event has age < lifetime
    events: Vec<CollisionEvent>,
    lifetime: u32,
}

impl CollisionQueue {
    pub fn new(lifetime: u32) -> Self {
        Self {
            events: Vec::new(),
            lifetime,
        }
    }

    pub fn lifetime(&self) -> u32 {
        self.lifetime
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = CollisionEvent>) {
        self.events.extend(events);
    }

    pub fn age_and_prune(&mut self) {
        for event in self.events.iter_mut() {
            event.age = event.age.saturating_add(1);
        }
        let lifetime = self.lifetime;
        self.events.retain(|e| e.age < lifetime);
    }

    /// How far along an event is, from 0 (new) to 1 (about to vanish).
    pub fn progress(&self, event: &CollisionEvent) -> f64 {
        f64::from(event.age) / f64::from(self.lifetime)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CollisionEvent> + '_ {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
