use kiss3d::window::Window;
use nalgebra::{Point2, Point3};

pub fn path_iter_parametric<F, S>(
    f: F,
    t_start: S,
    t_end: S,
    num_segments: usize,
) -> impl Iterator<Item = Point2<f32>>
where
    F: Fn(S) -> Point2<f32>,
    S: nalgebra::RealField + simba::scalar::SupersetOf<usize> + Copy,
{
    assert!(
        num_segments >= 1,
        "Must have at least one segment, num_segments was {}",
        num_segments
    );
    let convert = nalgebra::convert::<usize, S>;
    (0..=num_segments)
        .map(move |i| convert(i) / convert(num_segments))
        // u ranges from 0 to 1 (inclusive)
        .map(move |u| t_start + u * (t_end - t_start))
        .map(f)
}

pub fn draw_path<I: Iterator<Item = Point2<f32>>>(
    window: &mut Window,
    points: I,
    color: &Point3<f32>,
) {
    let mut prev_pt = None;
    for pt in points {
        if let Some(prev_pt) = prev_pt {
            window.draw_planar_line(&prev_pt, &pt, color);
        }
        prev_pt = Some(pt);
    }
}

/// Screen pixels (origin top left, y down) to the planar camera's frame
/// (origin in the middle, y up).
pub fn to_planar(p: &Point2<f64>, width: f64, height: f64) -> Point2<f32> {
    Point2::new((p.x - width / 2.0) as f32, (height / 2.0 - p.y) as f32)
}

/// Linear mix of two colors; `t = 0` is all `a`.
pub fn blend(a: &Point3<f32>, b: &Point3<f32>, t: f32) -> Point3<f32> {
    let t = nalgebra::clamp(t, 0.0, 1.0);
    Point3::from(a.coords * (1.0 - t) + b.coords * t)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_path_endpoints() {
        let points: Vec<_> =
            path_iter_parametric(|t: f32| Point2::new(t, 2.0 * t), 0.0, 1.0, 4).collect();
        assert_eq!(points.len(), 5);
        assert_relative_eq!(points[0], Point2::new(0.0, 0.0));
        assert_relative_eq!(points[4], Point2::new(1.0, 2.0));
    }

    #[test]
    fn test_to_planar() {
        assert_eq!(
            to_planar(&Point2::new(0.0, 0.0), 800.0, 600.0),
            Point2::new(-400.0, 300.0)
        );
        assert_eq!(
            to_planar(&Point2::new(400.0, 300.0), 800.0, 600.0),
            Point2::new(0.0, 0.0)
        );
    }

    #[test]
    fn test_blend() {
        let black = Point3::new(0.0, 0.0, 0.0);
        let white = Point3::new(1.0, 1.0, 1.0);
        assert_eq!(blend(&black, &white, 0.25), Point3::new(0.25, 0.25, 0.25));
        assert_eq!(blend(&black, &white, 7.0), white);
    }
}
