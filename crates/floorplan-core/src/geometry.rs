//! Point and segment math used by the snap engine and wall drawing.

use kurbo::Point;

/// Closest point on a segment together with its clamped projection parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPoint {
    /// The point on the segment.
    pub point: Point,
    /// Projection parameter along `a -> b`, clamped to `[0, 1]`.
    pub t: f64,
}

/// Project `p` onto the segment `a -> b`.
///
/// The projection parameter is clamped to `[0, 1]`, so the result always lies
/// on the segment. A zero-length segment yields `a` with `t = 0`.
pub fn closest_point_on_segment(a: Point, b: Point, p: Point) -> ClosestPoint {
    let vx = b.x - a.x;
    let vy = b.y - a.y;
    let wx = p.x - a.x;
    let wy = p.y - a.y;

    let c1 = vx * wx + vy * wy;
    if c1 <= 0.0 {
        return ClosestPoint { point: a, t: 0.0 };
    }

    let c2 = vx * vx + vy * vy;
    if c2 <= c1 {
        return ClosestPoint { point: b, t: 1.0 };
    }

    // c1 > 0 and c2 > c1 here, so c2 is never zero.
    let t = c1 / c2;
    ClosestPoint {
        point: Point::new(a.x + t * vx, a.y + t * vy),
        t,
    }
}

/// Squared Euclidean distance.
pub fn dist2(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Manhattan (taxicab) distance.
pub fn manhattan(a: Point, b: Point) -> f64 {
    (b.x - a.x).abs() + (b.y - a.y).abs()
}

/// Angle of the vector `b - a` in degrees, in `(-180, 180]`.
pub fn angle_deg(a: Point, b: Point) -> f64 {
    (b.y - a.y).atan2(b.x - a.x).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_inside_segment() {
        let cp = closest_point_on_segment(
            Point::new(0.0, 200.0),
            Point::new(500.0, 200.0),
            Point::new(103.0, 247.0),
        );
        assert_eq!(cp.point, Point::new(103.0, 200.0));
        assert!((cp.t - 103.0 / 500.0).abs() < 1e-12);
    }

    #[test]
    fn test_projection_clamps_to_start() {
        let cp = closest_point_on_segment(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(-30.0, 10.0),
        );
        assert_eq!(cp.point, Point::new(0.0, 0.0));
        assert_eq!(cp.t, 0.0);
    }

    #[test]
    fn test_projection_clamps_to_end() {
        let cp = closest_point_on_segment(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(130.0, -5.0),
        );
        assert_eq!(cp.point, Point::new(100.0, 0.0));
        assert_eq!(cp.t, 1.0);
    }

    #[test]
    fn test_zero_length_segment_has_no_nan() {
        let a = Point::new(40.0, 40.0);
        for p in [Point::new(0.0, 0.0), Point::new(40.0, 40.0), Point::new(90.0, -3.0)] {
            let cp = closest_point_on_segment(a, a, p);
            assert_eq!(cp.point, a);
            assert!(cp.t.is_finite());
        }
    }

    #[test]
    fn test_dist2() {
        assert_eq!(dist2(Point::new(0.0, 0.0), Point::new(3.0, 4.0)), 25.0);
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(manhattan(Point::new(0.0, 0.0), Point::new(2.0, -3.0)), 5.0);
    }

    #[test]
    fn test_angle_deg() {
        let o = Point::ZERO;
        assert!((angle_deg(o, Point::new(10.0, 0.0)) - 0.0).abs() < 1e-12);
        assert!((angle_deg(o, Point::new(0.0, 10.0)) - 90.0).abs() < 1e-12);
        assert!((angle_deg(o, Point::new(-10.0, 0.0)) - 180.0).abs() < 1e-12);
        assert!((angle_deg(o, Point::new(0.0, -10.0)) + 90.0).abs() < 1e-12);
    }
}
