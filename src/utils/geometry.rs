// src/utils/geometry.rs
use serde::{Deserialize, Serialize};

use crate::utils::util::{approx_equals, approx_zero, different_sign};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// The vector pointing from `other` to `self`.
    pub fn minus(&self, other: &Point2D) -> Vector2D {
        Vector2D::new(self.x - other.x, self.y - other.y)
    }

    pub fn offset(&self, delta: &Vector2D) -> Point2D {
        Point2D::new(self.x + delta.x, self.y + delta.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(&self, other: &Vector2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn scale(&self, t: f64) -> Vector2D {
        Vector2D::new(self.x * t, self.y * t)
    }
}

/// Which side of a directed line a point falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Right,
    On,
    Left,
}

/// A directed line segment. Side tests treat it as an infinite line running
/// from `start` through `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seg2D {
    pub start: Point2D,
    pub end: Point2D,
}

impl Seg2D {
    pub fn new(start: Point2D, end: Point2D) -> Self {
        Self { start, end }
    }

    pub fn delta(&self) -> Vector2D {
        self.end.minus(&self.start)
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    /// The point at time `t`, where 0 is the start and 1 is the end.
    pub fn from_time(&self, t: f64) -> Point2D {
        self.start.offset(&self.delta().scale(t))
    }

    /// Positive on the left, negative on the right, zero on the line.
    pub fn perp_dot(&self, point: &Point2D) -> f64 {
        let delta = self.delta();
        (delta.x * (point.y - self.start.y)) - (delta.y * (point.x - self.start.x))
    }

    /// Points on the line count as being on the right.
    pub fn on_right(&self, point: &Point2D) -> bool {
        self.perp_dot(point) <= 0.0
    }

    pub fn on_right_seg(&self, seg: &Seg2D) -> bool {
        self.on_right(&seg.start) && self.on_right(&seg.end)
    }

    pub fn to_side(&self, point: &Point2D, epsilon: f64) -> Rotation {
        let value = self.perp_dot(point);
        if approx_zero(value, epsilon) {
            Rotation::On
        } else if value < 0.0 {
            Rotation::Right
        } else {
            Rotation::Left
        }
    }

    pub fn parallel(&self, seg: &Seg2D, epsilon: f64) -> bool {
        let delta = self.delta();
        let other = seg.delta();
        approx_equals(delta.y * other.x, delta.x * other.y, epsilon)
    }

    /// Both endpoints of `seg` lie on this segment's line.
    pub fn collinear(&self, seg: &Seg2D, epsilon: f64) -> bool {
        collinear_helper(&seg.start, &self.start, &self.end, epsilon)
            && collinear_helper(&seg.end, &self.start, &self.end, epsilon)
    }

    /// Neither axis of the two deltas points in opposite directions.
    pub fn same_direction(&self, seg: &Seg2D) -> bool {
        let delta = self.delta();
        let other = seg.delta();
        !different_sign(delta.x, other.x) && !different_sign(delta.y, other.y)
    }

    /// Intersects the infinite lines through both segments, returning the
    /// time along `self` and the time along `seg`. `None` when parallel.
    pub fn intersection_as_line(&self, seg: &Seg2D, epsilon: f64) -> Option<(f64, f64)> {
        let delta = self.delta();
        let other = seg.delta();
        let determinant = (-other.x * delta.y) + (delta.x * other.y);
        if approx_zero(determinant, epsilon) {
            return None;
        }

        let start_delta = self.start.minus(&seg.start);
        let inverse = 1.0 / determinant;
        let t_this = ((other.x * start_delta.y) - (other.y * start_delta.x)) * inverse;
        let t_other = ((-delta.y * start_delta.x) + (delta.x * start_delta.y)) * inverse;
        Some((t_this, t_other))
    }
}

// Twice the signed area of the triangle (a, b, c).
fn collinear_helper(a: &Point2D, b: &Point2D, c: &Point2D, epsilon: f64) -> bool {
    approx_zero((a.x * (b.y - c.y)) + (b.x * (c.y - a.y)) + (c.x * (a.y - b.y)), epsilon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::util::DEFAULT_EPSILON;
    use assert_approx_eq::assert_approx_eq;

    fn seg(sx: f64, sy: f64, ex: f64, ey: f64) -> Seg2D {
        Seg2D::new(Point2D::new(sx, sy), Point2D::new(ex, ey))
    }

    #[test]
    fn test_perp_dot_and_sides() {
        let line = seg(0.0, 0.0, 10.0, 0.0);
        assert_approx_eq!(line.perp_dot(&Point2D::new(5.0, -5.0)), -50.0);
        assert!(line.on_right(&Point2D::new(5.0, -5.0)));
        assert!(!line.on_right(&Point2D::new(5.0, 5.0)));
        // On the line counts as right.
        assert!(line.on_right(&Point2D::new(20.0, 0.0)));
    }

    #[test]
    fn test_to_side() {
        let line = seg(0.0, 0.0, 10.0, 0.0);
        assert_eq!(line.to_side(&Point2D::new(3.0, -1.0), DEFAULT_EPSILON), Rotation::Right);
        assert_eq!(line.to_side(&Point2D::new(3.0, 1.0), DEFAULT_EPSILON), Rotation::Left);
        assert_eq!(line.to_side(&Point2D::new(3.0, 0.0), DEFAULT_EPSILON), Rotation::On);
    }

    #[test]
    fn test_from_time_and_length() {
        let s = seg(0.0, 0.0, 3.0, 4.0);
        assert_approx_eq!(s.length(), 5.0);
        let mid = s.from_time(0.5);
        assert_approx_eq!(mid.x, 1.5);
        assert_approx_eq!(mid.y, 2.0);
    }

    #[test]
    fn test_parallel_and_collinear() {
        let line = seg(0.0, 0.0, 10.0, 0.0);
        assert!(line.parallel(&seg(2.0, 5.0, 8.0, 5.0), DEFAULT_EPSILON));
        assert!(!line.collinear(&seg(2.0, 5.0, 8.0, 5.0), DEFAULT_EPSILON));
        assert!(line.collinear(&seg(12.0, 0.0, 20.0, 0.0), DEFAULT_EPSILON));
        assert!(!line.parallel(&seg(0.0, 0.0, 1.0, 1.0), DEFAULT_EPSILON));
    }

    #[test]
    fn test_same_direction() {
        let line = seg(0.0, 0.0, 10.0, 0.0);
        assert!(line.same_direction(&seg(2.0, 0.0, 8.0, 0.0)));
        assert!(!line.same_direction(&seg(8.0, 0.0, 2.0, 0.0)));
    }

    #[test]
    fn test_intersection_as_line() {
        let line = seg(0.0, 0.0, 10.0, 0.0);
        let (t_line, t_other) = line.intersection_as_line(&seg(5.0, -5.0, 5.0, 5.0), DEFAULT_EPSILON).unwrap();
        assert_approx_eq!(t_line, 0.5);
        assert_approx_eq!(t_other, 0.5);

        // Beyond the end of the first segment.
        let (t_line, t_other) = line.intersection_as_line(&seg(20.0, 2.0, 20.0, 4.0), DEFAULT_EPSILON).unwrap();
        assert_approx_eq!(t_line, 2.0);
        assert_approx_eq!(t_other, -1.0);

        assert!(line.intersection_as_line(&seg(0.0, 1.0, 10.0, 1.0), DEFAULT_EPSILON).is_none());
    }
}
