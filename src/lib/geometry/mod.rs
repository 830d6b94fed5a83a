use log::trace;
use nalgebra::geometry::Point2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point2<f64>,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point2<f64>, radius: f64) -> Self {
        Circle { center, radius }
    }

    pub fn contains(&self, p: &Point2<f64>) -> bool {
        (p - self.center).norm() < self.radius
    }
}

/// Given the LineSegment `line`, return the portion of it that is inside the circle `c`, if any.
/// If `line` only touches `circle`, return None instead of a zero-length line
pub fn trim(line: LineSegment, circle: Circle) -> Option<LineSegment> {
    // Vector from circle center to line start
    let to_start = line.start - circle.center;

    // Line direction vector
    let dir = line.end - line.start;
    let len_sq = dir.norm_squared();

    // Degenerate, zero-length line
    if len_sq == 0.0 {
        return if to_start.norm_squared() <= circle.radius * circle.radius {
            Some(line)
        } else {
            None
        };
    }

    // Line: P(t) = start + t * dir, where t ∈ [0, 1]
    // Circle: |P(t) - center|² = radius²
    let a = len_sq;
    let b = 2.0 * to_start.dot(&dir);
    let c = to_start.norm_squared() - circle.radius * circle.radius;

    let discriminant = b * b - 4.0 * a * c;
    trace!("Trim discriminant {discriminant}: {a} {b} {c}");
    if discriminant <= 0.0 {
        return None;
    }

    let sqrt_disc = discriminant.sqrt();
    let t1 = (-b - sqrt_disc) / (2.0 * a);
    let t2 = (-b + sqrt_disc) / (2.0 * a);

    if (t1 > 1.0 && t2 > 1.0) || (t1 < 0.0 && t2 < 0.0) {
        return None;
    }

    let t_min = t1.max(0.0).min(1.0);
    let t_max = t2.max(0.0).min(1.0);

    Some(LineSegment {
        start: line.start + t_min * dir,
        end: line.start + t_max * dir,
    })
}

/// Drop the leading part of `points` that lies inside `circle`.
///
/// `points` is expected to move away from the circle, like an involute flank
/// moving out from the centre. When it starts inside, the result begins with
/// the point where the polyline leaves the circle.
pub fn clip_outside(points: &[Point2<f64>], circle: Circle) -> Vec<Point2<f64>> {
    let first_outside = match points.iter().position(|p| !circle.contains(p)) {
        Some(i) => i,
        None => return Vec::new(),
    };
    if first_outside == 0 {
        return points.to_vec();
    }

    let crossing = LineSegment {
        start: points[first_outside - 1],
        end: points[first_outside],
    };
    let mut clipped = Vec::with_capacity(points.len() - first_outside + 1);
    // Start is inside, so the trimmed segment ends on the circle
    if let Some(inside) = trim(crossing, circle) {
        if inside.end != points[first_outside] {
            clipped.push(inside.end);
        }
    }
    clipped.extend_from_slice(&points[first_outside..]);
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-10;

    fn points_equal(p1: Point2<f64>, p2: Point2<f64>) -> bool {
        (p1 - p2).norm() < EPSILON
    }

    fn unit_circle() -> Circle {
        Circle::new(Point2::new(0.0, 0.0), 1.0)
    }

    #[test]
    fn test_line_completely_outside_circle() {
        let line = LineSegment {
            start: Point2::new(2.0, 0.0),
            end: Point2::new(3.0, 0.0),
        };
        assert!(trim(line, unit_circle()).is_none());
    }

    #[test]
    fn test_line_completely_inside_circle() {
        let circle = Circle::new(Point2::new(0.0, 0.0), 2.0);
        let line = LineSegment {
            start: Point2::new(-0.5, 0.0),
            end: Point2::new(0.5, 0.0),
        };

        let result = trim(line, circle).unwrap();
        assert!(points_equal(result.start, Point2::new(-0.5, 0.0)));
        assert!(points_equal(result.end, Point2::new(0.5, 0.0)));
    }

    #[test]
    fn test_line_one_end_inside_one_outside() {
        let line = LineSegment {
            start: Point2::new(0.5, 0.0),
            end: Point2::new(2.0, 0.0),
        };

        let result = trim(line, unit_circle()).unwrap();
        assert!(points_equal(result.start, Point2::new(0.5, 0.0)));
        assert!(points_equal(result.end, Point2::new(1.0, 0.0)));
    }

    #[test]
    fn test_line_tangent_to_circle() {
        let line = LineSegment {
            start: Point2::new(-1.0, 1.0),
            end: Point2::new(1.0, 1.0),
        };
        assert!(trim(line, unit_circle()).is_none());
    }

    #[test]
    fn test_diagonal_line_intersection() {
        let line = LineSegment {
            start: Point2::new(-2.0, -2.0),
            end: Point2::new(2.0, 2.0),
        };

        let result = trim(line, unit_circle()).unwrap();
        let expected_coord = 1.0 / 2.0_f64.sqrt();
        assert!(points_equal(
            result.start,
            Point2::new(-expected_coord, -expected_coord)
        ));
        assert!(points_equal(
            result.end,
            Point2::new(expected_coord, expected_coord)
        ));
    }

    #[test]
    fn test_clip_starting_inside() {
        let points = [
            Point2::new(0.5, 0.0),
            Point2::new(0.8, 0.1),
            Point2::new(1.5, 0.3),
            Point2::new(2.0, 0.5),
        ];
        let clipped = clip_outside(&points, unit_circle());
        assert_eq!(clipped.len(), 3);
        assert!((clipped[0].coords.norm() - 1.0).abs() < EPSILON);
        assert_eq!(clipped[1], points[2]);
        assert_eq!(clipped[2], points[3]);
    }

    #[test]
    fn test_clip_already_outside() {
        let points = [Point2::new(1.5, 0.0), Point2::new(2.0, 0.0)];
        assert_eq!(clip_outside(&points, unit_circle()), points.to_vec());
    }

    #[test]
    fn test_clip_all_inside() {
        let points = [Point2::new(0.1, 0.0), Point2::new(0.2, 0.0)];
        assert!(clip_outside(&points, unit_circle()).is_empty());
    }
}
