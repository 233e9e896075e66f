use nalgebra::{Point2, Vector2};

/// Axis-aligned rectangle in screen space (y grows downwards, but nothing
/// here cares).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    min: Point2<f64>,
    max: Point2<f64>,
}

impl Rect {
    pub fn new(a: Point2<f64>, b: Point2<f64>) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn centered(center: Point2<f64>, half_extents: Vector2<f64>) -> Self {
        let half_extents = half_extents.abs();
        Self::new(center - half_extents, center + half_extents)
    }

    pub fn min(&self) -> Point2<f64> {
        self.min
    }

    pub fn max(&self) -> Point2<f64> {
        self.max
    }

    pub fn center(&self) -> Point2<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Strict containment: points on the border are outside.
    pub fn contains(&self, p: &Point2<f64>) -> bool {
        self.min.x < p.x && p.x < self.max.x && self.min.y < p.y && p.y < self.max.y
    }

    /// If `p` is inside, moves it onto the closest edge. Points outside are
    /// returned unchanged.
    pub fn push_to_nearest_edge(&self, p: &Point2<f64>) -> Point2<f64> {
        if !self.contains(p) {
            return *p;
        }

        let to_left = p.x - self.min.x;
        let to_right = self.max.x - p.x;
        let to_top = p.y - self.min.y;
        let to_bottom = self.max.y - p.y;

        let nearest = to_left.min(to_right).min(to_top).min(to_bottom);
        if nearest == to_left {
            Point2::new(self.min.x, p.y)
        } else if nearest == to_right {
            Point2::new(self.max.x, p.y)
        } else if nearest == to_top {
            Point2::new(p.x, self.min.y)
        } else {
            Point2::new(p.x, self.max.y)
        }
    }
}

/// Clamps `value` into `[lo, hi]`. If the range is empty (lo > hi), returns
/// the midpoint, which is what you want when a viewport is too small to hold
/// an object at all.
pub fn clamp_or_center(value: f64, lo: f64, hi: f64) -> f64 {
    if lo > hi {
        (lo + hi) / 2.0
    } else {
        nalgebra::clamp(value, lo, hi)
    }
}

pub fn all_finite(p: &Point2<f64>) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_push_to_nearest_edge() {
        let rect = Rect::centered(Point2::new(50.0, 50.0), Vector2::new(20.0, 10.0));

        // Closest to the left edge
        assert_eq!(
            rect.push_to_nearest_edge(&Point2::new(32.0, 50.0)),
            Point2::new(30.0, 50.0)
        );
        // Closest to the bottom edge (y = 60)
        assert_eq!(
            rect.push_to_nearest_edge(&Point2::new(50.0, 58.0)),
            Point2::new(50.0, 60.0)
        );
        // Outside is untouched
        assert_eq!(
            rect.push_to_nearest_edge(&Point2::new(0.0, 0.0)),
            Point2::new(0.0, 0.0)
        );
        // On the border counts as outside
        assert_eq!(
            rect.push_to_nearest_edge(&Point2::new(30.0, 50.0)),
            Point2::new(30.0, 50.0)
        );
    }

    #[test]
    fn test_rect_normalizes_corners() {
        let rect = Rect::new(Point2::new(10.0, 0.0), Point2::new(0.0, 10.0));
        assert_eq!(rect.min(), Point2::new(0.0, 0.0));
        assert_eq!(rect.max(), Point2::new(10.0, 10.0));
        assert_relative_eq!(rect.center(), Point2::new(5.0, 5.0));
    }

    #[test]
    fn test_clamp_or_center() {
        assert_eq!(clamp_or_center(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp_or_center(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp_or_center(50.0, 0.0, 10.0), 10.0);
        // Empty range collapses to the middle
        assert_eq!(clamp_or_center(3.0, 60.0, 40.0), 50.0);
    }
}
