use nalgebra::Point2;

use crate::math::anomaly::{eccentric_to_true, mean_to_eccentric};
use crate::model::OrbitElements;

/// Every frame is exactly one unit of simulation time.
pub const FRAME_DELTA: f64 = 1.0;

#[derive(Debug, Clone, Copy)]
pub struct OrbitStep {
    pub mean_anomaly: f64,
    pub eccentric_anomaly: f64,
    pub true_anomaly: f64,
    /// Distance from the focus, a(1 - e cos E).
    pub radius: f64,
    pub position: Point2<f64>,
}

/// Moves the orbit forward by one frame and works out where the body is.
/// Doesn't touch the orbit; the caller stores `mean_anomaly` back.
pub fn advance(orbit: &OrbitElements) -> OrbitStep {
    let delta = orbit.angular_rate() * orbit.direction().sign() * FRAME_DELTA;
    state_at(orbit, orbit.mean_anomaly() + delta)
}

pub fn state_at(orbit: &OrbitElements, mean_anomaly: f64) -> OrbitStep {
    let e = orbit.eccentricity();
    let a = orbit.semimajor_axis();
    let b = orbit.semiminor_axis();

    let eccentric_anomaly = mean_to_eccentric(mean_anomaly, e);
    let true_anomaly = eccentric_to_true(eccentric_anomaly, e);
    let radius = a * (1.0 - e * eccentric_anomaly.cos());

    // x follows the true anomaly, y the eccentric anomaly on the minor axis.
    // It's not the textbook ellipse-about-a-focus, but it's the motion the
    // visualization was tuned against.
    let center = orbit.center();
    let position = Point2::new(
        center.x + radius * true_anomaly.cos(),
        center.y + b * eccentric_anomaly.sin(),
    );

    OrbitStep {
        mean_anomaly,
        eccentric_anomaly,
        true_anomaly,
        radius,
        position,
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::model::Direction;

    fn orbit(e: f64, rate: f64, direction: Direction) -> OrbitElements {
        OrbitElements::new(Point2::new(50.0, 50.0), 10.0, e, 0.0, rate, direction)
    }

    #[test]
    fn test_circular_orbit_returns_home() {
        let mut orbit = orbit(0.0, 0.01, Direction::Clockwise);
        let start = state_at(&orbit, orbit.mean_anomaly()).position;
        assert_relative_eq!(start, Point2::new(60.0, 50.0), epsilon = 1e-12);

        for _ in 0..628 {
            let step = advance(&orbit);
            orbit.set_mean_anomaly(step.mean_anomaly);
        }

        // 628 frames is just shy of 2pi / 0.01
        assert_relative_eq!(orbit.mean_anomaly(), -6.28, epsilon = 1e-9);
        let end = state_at(&orbit, orbit.mean_anomaly()).position;
        assert_relative_eq!(end, start, epsilon = 0.05);
    }

    #[test]
    fn test_direction_sign() {
        let ccw = advance(&orbit(0.0, 0.1, Direction::CounterClockwise));
        let cw = advance(&orbit(0.0, 0.1, Direction::Clockwise));
        assert_relative_eq!(ccw.mean_anomaly, 0.1);
        assert_relative_eq!(cw.mean_anomaly, -0.1);
        // Same x, mirrored y
        assert_relative_eq!(ccw.position.x, cw.position.x, epsilon = 1e-12);
        assert_relative_eq!(ccw.position.y - 50.0, 50.0 - cw.position.y, epsilon = 1e-12);
    }

    #[test]
    fn test_apsides_positions() {
        let orbit = orbit(0.5, 0.0, Direction::CounterClockwise);
        let peri = state_at(&orbit, 0.0);
        assert_relative_eq!(peri.radius, 5.0, epsilon = 1e-12);
        assert_relative_eq!(peri.position, Point2::new(55.0, 50.0), epsilon = 1e-9);

        let apo = state_at(&orbit, PI);
        assert_relative_eq!(apo.radius, 15.0, epsilon = 1e-9);
        assert_relative_eq!(apo.position, Point2::new(35.0, 50.0), epsilon = 1e-6);
    }

    proptest! {
        #[test]
        fn prop_radius_within_apsides(e in 0.0..0.99f64, m in -100.0..100.0f64) {
            let orbit = OrbitElements::new(
                Point2::new(0.0, 0.0), 10.0, e, m, 0.01, Direction::CounterClockwise,
            );
            let step = state_at(&orbit, m);
            let tolerance = 1e-9;
            prop_assert!(step.radius >= orbit.perihelion() - tolerance);
            prop_assert!(step.radius <= orbit.aphelion() + tolerance);
            prop_assert!(step.position.x.is_finite() && step.position.y.is_finite());
        }
    }
}
