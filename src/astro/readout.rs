use std::f64::consts::PI;

use crate::model::Body;

/// Bodies are treated as uniform spheres; this is mass per cubic pixel of
/// base size. The units are made up, the ratios between bodies are not.
pub const MASS_DENSITY: f64 = 1.0e-3;

/// The numbers shown in the detail panel for a selected body. Lengths are in
/// viewport percent, times in frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsReadout {
    pub orbital_velocity: f64,
    pub radial_distance: f64,
    pub aphelion: f64,
    pub perihelion: f64,
    pub mass: f64,
    /// `None` for a body that isn't moving.
    pub period: Option<f64>,
}

impl PhysicsReadout {
    pub fn of(body: &Body) -> Self {
        let orbit = body.orbit();
        let a = orbit.semimajor_axis();

        let period = if orbit.angular_rate() > 0.0 {
            Some(orbit.angular_rate().recip())
        } else {
            None
        };
        let orbital_velocity = match period {
            Some(period) => 2.0 * PI * a / period,
            None => 0.0,
        };

        Self {
            orbital_velocity,
            radial_distance: nalgebra::distance(&body.orbit_position(), &orbit.center()),
            aphelion: orbit.aphelion(),
            perihelion: orbit.perihelion(),
            mass: MASS_DENSITY * body.base_size().powi(3),
            period,
        }
    }
}
