use std::f64::consts::PI;

use nalgebra::Point3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{parse_color, OrbitOverride, SkillRecord};
use crate::config::LayoutConfig;
use crate::model::{BodyInfo, BodyParams, Direction, Oscillator};

// Keeps the layout stream apart from the scene's effect stream
const LAYOUT_SALT: u64 = 0x5eed_0f_0b17;

const DEFAULT_COLORS: [[f32; 3]; 8] = [
    [0.87, 0.65, 0.52],
    [0.35, 0.62, 0.90],
    [0.55, 0.80, 0.45],
    [0.95, 0.77, 0.30],
    [0.78, 0.45, 0.85],
    [0.95, 0.45, 0.45],
    [0.40, 0.85, 0.82],
    [0.85, 0.85, 0.90],
];

pub fn default_color(index: usize) -> Point3<f32> {
    let [r, g, b] = DEFAULT_COLORS[index % DEFAULT_COLORS.len()];
    Point3::new(r, g, b)
}

/// Turns skill records into body parameters. Same records and seed, same
/// sky.
pub fn build_bodies(
    records: &[SkillRecord],
    config: &LayoutConfig,
    seed: u64,
) -> Vec<(BodyInfo, BodyParams)> {
    let mut rng = StdRng::seed_from_u64(seed ^ LAYOUT_SALT);

    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            // Always draw, so one override doesn't reshuffle everyone after it
            let mut params = body_params(config, i, &mut rng);
            if let Some(orbit) = &record.orbit {
                apply_override(orbit, &mut params);
            }
            (body_info(record, i), params)
        })
        .collect()
}

fn body_info(record: &SkillRecord, index: usize) -> BodyInfo {
    let color = match record.color.as_deref() {
        Some(hex) => parse_color(hex).unwrap_or_else(|| {
            log::warn!("bad color {:?} for {}, using a default", hex, record.name);
            default_color(index)
        }),
        None => default_color(index),
    };
    BodyInfo {
        name: record.name.clone(),
        color,
        icon: record.icon.clone(),
    }
}

/// Orbit number `index`, counting outwards. Neighbours go opposite ways.
pub fn body_params(config: &LayoutConfig, index: usize, rng: &mut impl Rng) -> BodyParams {
    let a = config.inner_axis + config.axis_step * index as f64;
    // Kepler's third law: rate goes like a^(-3/2)
    let rate = config.inner_rate * (config.inner_axis / a).powf(1.5);
    let direction = if index % 2 == 0 {
        Direction::CounterClockwise
    } else {
        Direction::Clockwise
    };

    let depth = config.depth_amplitude.abs();
    let float = config.float_amplitude.abs();

    BodyParams {
        center: config.center,
        semimajor_axis: a,
        eccentricity: rng.random_range(0.0..=config.max_eccentricity),
        mean_anomaly: rng.random_range(0.0..2.0 * PI),
        angular_rate: rate,
        direction,
        base_size: config.base_size * rng.random_range(0.8..=1.2),
        base_depth: rng.random_range(-depth / 2.0..=depth / 2.0),
        depth: Oscillator::new(
            depth,
            rng.random_range(0.2..=0.5),
            rng.random_range(0.0..2.0 * PI),
        ),
        float_x: Oscillator::new(
            float,
            rng.random_range(0.5..=1.2),
            rng.random_range(0.0..2.0 * PI),
        ),
        float_y: Oscillator::new(
            float,
            rng.random_range(0.5..=1.2),
            rng.random_range(0.0..2.0 * PI),
        ),
        rotation_rate: rng.random_range(-0.02..=0.02),
    }
}

fn apply_override(orbit: &OrbitOverride, params: &mut BodyParams) {
    if let Some(a) = orbit.semimajor_axis {
        params.semimajor_axis = a;
    }
    if let Some(e) = orbit.eccentricity {
        params.eccentricity = e;
    }
    if let Some(m) = orbit.mean_anomaly {
        params.mean_anomaly = m;
    }
    if let Some(rate) = orbit.angular_rate {
        params.angular_rate = rate;
    }
    if let Some(clockwise) = orbit.clockwise {
        params.direction = if clockwise {
            Direction::Clockwise
        } else {
            Direction::CounterClockwise
        };
    }
    if let Some(size) = orbit.size {
        params.base_size = size;
    }
    if let Some(depth) = orbit.depth {
        params.base_depth = depth;
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn records(n: usize) -> Vec<SkillRecord> {
        (0..n)
            .map(|i| SkillRecord::named(format!("skill-{}", i)))
            .collect()
    }

    #[test]
    fn test_same_seed_same_layout() {
        let config = LayoutConfig::default();
        let a = build_bodies(&records(5), &config, 42);
        let b = build_bodies(&records(5), &config, 42);
        for ((_, pa), (_, pb)) in a.iter().zip(b.iter()) {
            assert_eq!(pa.eccentricity, pb.eccentricity);
            assert_eq!(pa.mean_anomaly, pb.mean_anomaly);
            assert_eq!(pa.base_depth, pb.base_depth);
        }
    }

    #[test]
    fn test_outer_orbits_are_slower() {
        let config = LayoutConfig::default();
        let bodies = build_bodies(&records(4), &config, 0);
        assert_relative_eq!(bodies[0].1.angular_rate, config.inner_rate);
        for pair in bodies.windows(2) {
            assert!(pair[0].1.semimajor_axis < pair[1].1.semimajor_axis);
            assert!(pair[0].1.angular_rate > pair[1].1.angular_rate);
            assert_ne!(pair[0].1.direction, pair[1].1.direction);
        }
        for (_, params) in bodies.iter() {
            assert!((0.0..=config.max_eccentricity).contains(&params.eccentricity));
        }
    }

    #[test]
    fn test_override_wins() {
        let mut skills = records(2);
        skills[1].orbit = Some(OrbitOverride {
            semimajor_axis: Some(40.0),
            clockwise: Some(false),
            ..Default::default()
        });
        let bodies = build_bodies(&skills, &LayoutConfig::default(), 0);
        assert_eq!(bodies[1].1.semimajor_axis, 40.0);
        assert_eq!(bodies[1].1.direction, Direction::CounterClockwise);
    }

    #[test]
    fn test_colors() {
        let mut skills = records(3);
        skills[0].color = Some(String::from("#0000ff"));
        skills[1].color = Some(String::from("not a color"));
        let bodies = build_bodies(&skills, &LayoutConfig::default(), 0);
        assert_eq!(bodies[0].0.color, Point3::new(0.0, 0.0, 1.0));
        assert_eq!(bodies[1].0.color, default_color(1));
        assert_eq!(bodies[2].0.color, default_color(2));
        assert_eq!(bodies[2].0.name, "skill-2");
    }
}
