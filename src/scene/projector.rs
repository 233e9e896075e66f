use nalgebra::{Point2, Vector2};

use super::Viewport;
use crate::config::ProjectorConfig;
use crate::math::geometry::{clamp_or_center, Rect};
use crate::model::Oscillator;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub position: Point2<f64>,
    /// Diameter, pixels.
    pub size: f64,
    pub scale: f64,
    pub depth: f64,
}

/// Fakes depth on a flat surface: things further away get smaller and slide
/// towards the middle of the screen.
#[derive(Debug, Clone)]
pub struct PerspectiveProjector {
    config: ProjectorConfig,
}

impl PerspectiveProjector {
    pub fn new(config: ProjectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectorConfig {
        &self.config
    }

    pub fn depth(&self, base_depth: f64, oscillation: &Oscillator, t: f64) -> f64 {
        base_depth + oscillation.at(t)
    }

    pub fn scale(&self, depth: f64) -> f64 {
        let d = self.config.camera_distance;
        let raw = d / (d + depth);
        // Behind the camera (d + z <= 0) is as close as it gets
        let raw = if raw.is_nan() || raw < 0.0 {
            self.config.max_scale
        } else {
            raw
        };
        nalgebra::clamp(raw, self.config.min_scale, self.config.max_scale)
    }

    pub fn size(&self, base_size: f64, scale: f64) -> f64 {
        nalgebra::clamp(
            base_size * scale,
            self.config.size_floor,
            self.config.size_ceiling,
        )
    }

    /// Projects a point already in pixel space. `t` is wall-clock seconds.
    pub fn project(
        &self,
        position: Point2<f64>,
        base_size: f64,
        base_depth: f64,
        oscillation: &Oscillator,
        t: f64,
        viewport: &Viewport,
    ) -> Projection {
        let depth = self.depth(base_depth, oscillation, t);
        let scale = self.scale(depth);
        let size = self.size(base_size, scale);

        // Parallax: offsets from the center shrink with distance
        let center = viewport.center();
        let parallaxed = center + (position - center) * scale;

        // Keep the whole disk on screen
        let inset = size / 2.0 + self.config.margin;
        let clamped = Point2::new(
            clamp_or_center(parallaxed.x, inset, viewport.width - inset),
            clamp_or_center(parallaxed.y, inset, viewport.height - inset),
        );

        let position = self.avoid_rect(viewport).push_to_nearest_edge(&clamped);

        Projection {
            position,
            size,
            scale,
            depth,
        }
    }

    /// The middle of the screen is reserved for page content.
    pub fn avoid_rect(&self, viewport: &Viewport) -> Rect {
        let [fx, fy] = self.config.avoid_fraction;
        Rect::centered(
            viewport.center(),
            Vector2::new(viewport.width * fx / 2.0, viewport.height * fy / 2.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use super::*;

    fn projector() -> PerspectiveProjector {
        PerspectiveProjector::new(ProjectorConfig::default())
    }

    fn no_avoid() -> PerspectiveProjector {
        PerspectiveProjector::new(ProjectorConfig {
            avoid_fraction: [0.0, 0.0],
            ..Default::default()
        })
    }

    const VIEWPORT: Viewport = Viewport {
        width: 1000.0,
        height: 800.0,
    };

    #[test]
    fn test_scale_constants() {
        let p = projector();
        assert_relative_eq!(p.scale(0.0), 1.0);
        assert_relative_eq!(p.scale(800.0), 0.5);
        // Far away bottoms out, close up tops out
        assert_relative_eq!(p.scale(5000.0), 0.4);
        assert_relative_eq!(p.scale(-500.0), 1.4);
        // At or behind the camera plane
        assert_relative_eq!(p.scale(-800.0), 1.4);
        assert_relative_eq!(p.scale(-2000.0), 1.4);
    }

    #[test]
    fn test_depth_oscillates() {
        let p = projector();
        let osc = Oscillator::new(100.0, 2.0, 0.0);
        assert_relative_eq!(p.depth(50.0, &osc, 0.0), 50.0);
        assert_relative_eq!(
            p.depth(50.0, &osc, std::f64::consts::FRAC_PI_4),
            150.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_parallax_pulls_towards_center() {
        let p = no_avoid();
        let still = Oscillator::default();
        // depth 800 => scale 0.5
        let proj = p.project(Point2::new(700.0, 400.0), 100.0, 800.0, &still, 0.0, &VIEWPORT);
        assert_relative_eq!(proj.scale, 0.5);
        assert_relative_eq!(proj.size, 50.0);
        assert_relative_eq!(proj.position, Point2::new(600.0, 400.0));
    }

    #[test]
    fn test_clamped_into_viewport() {
        let p = no_avoid();
        let still = Oscillator::default();
        let proj = p.project(Point2::new(-500.0, 5000.0), 60.0, 0.0, &still, 0.0, &VIEWPORT);
        // half size 30 + margin 10
        assert_relative_eq!(proj.position, Point2::new(40.0, 760.0));
    }

    #[test]
    fn test_avoid_rect() {
        let p = projector();
        let still = Oscillator::default();
        // Avoid rect is x in [300, 700], y in [280, 520]; (320, 400) is
        // closest to the left edge
        let proj = p.project(Point2::new(320.0, 400.0), 60.0, 0.0, &still, 0.0, &VIEWPORT);
        assert_relative_eq!(proj.position, Point2::new(300.0, 400.0));
    }

    #[test]
    fn test_tiny_viewport_collapses_to_center() {
        let p = no_avoid();
        let still = Oscillator::default();
        let tiny = Viewport {
            width: 20.0,
            height: 20.0,
        };
        let proj = p.project(Point2::new(0.0, 0.0), 60.0, 0.0, &still, 0.0, &tiny);
        assert_relative_eq!(proj.position, Point2::new(10.0, 10.0));
    }

    proptest! {
        #[test]
        fn prop_size_within_bounds(
            base_size in 0.0..1000.0f64,
            base_depth in -5000.0..5000.0f64,
            amplitude in 0.0..1000.0f64,
            t in 0.0..1000.0f64,
        ) {
            let p = projector();
            let osc = Oscillator::new(amplitude, 0.3, 0.0);
            let proj = p.project(Point2::new(100.0, 100.0), base_size, base_depth, &osc, t, &VIEWPORT);
            prop_assert!((30.0..=120.0).contains(&proj.size));
            // Clamping is idempotent
            prop_assert_eq!(p.size(proj.size, 1.0), proj.size);
        }
    }
}
