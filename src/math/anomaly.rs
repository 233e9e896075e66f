use std::f64::consts::PI;

use crate::math::root_finding::newton_fixed_steps;

/// Number of Newton steps spent on Kepler's equation each frame. This is a
/// fixed budget rather than a tolerance.
pub const KEPLER_ITERATIONS: usize = 3;

/// Reduces an angle into [0, 2pi).
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(2.0 * PI);
    // rem_euclid can round up to exactly 2pi for tiny negative inputs
    if wrapped >= 2.0 * PI {
        0.0
    } else {
        wrapped
    }
}

pub fn mean_to_eccentric(mean_anomaly: f64, e: f64) -> f64 {
    debug_assert!((0.0..1.0).contains(&e));

    // Mean anomaly keeps growing forever, so reduce it first. Otherwise the
    // starting guess is as good as it is near zero, but the sin/cos calls lose
    // precision for no reason.
    let mean_anomaly = wrap_angle(mean_anomaly);

    let kepler = |x: f64| -> f64 { x - e * x.sin() - mean_anomaly };
    let kepler_der = |x: f64| -> f64 { 1.0 - e * x.cos() };

    let guess = mean_anomaly + e * mean_anomaly.sin();
    newton_fixed_steps(|x| (kepler(x), kepler_der(x)), guess, KEPLER_ITERATIONS)
}

pub fn eccentric_to_mean(eccentric_anomaly: f64, e: f64) -> f64 {
    debug_assert!(e < 1.0);
    eccentric_anomaly - e * eccentric_anomaly.sin()
}

pub fn eccentric_to_true(eccentric_anomaly: f64, e: f64) -> f64 {
    // We have that tan(theta/2) = sqrt((1+e)/(1-e)) * tan(E/2). Splitting it
    // into atan2 keeps the quadrant right and never divides by zero at E = pi.
    let half = eccentric_anomaly / 2.0;
    2.0 * f64::atan2((1.0 + e).sqrt() * half.sin(), (1.0 - e).sqrt() * half.cos())
}

pub fn mean_to_true(mean_anomaly: f64, ecc: f64) -> f64 {
    eccentric_to_true(mean_to_eccentric(mean_anomaly, ecc), ecc)
}
