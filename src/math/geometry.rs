//! Plane geometry used to describe element directrices

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Tolerance used when comparing lengths and positions
pub const GEOMETRY_EPSILON: f64 = 1e-10;

/// A point in the global XY plane
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another point
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Lexicographic comparison: first by x, then by y
    pub fn lexicographic_cmp(&self, other: &Point) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
    }
}

/// Orthonormal frame attached to a straight element.
///
/// `i` is the unit vector along the element (start to end) and `j` its
/// counter-clockwise normal, so local Z coincides with global Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RefFrame {
    /// Direction cosine (cos of the angle from global X)
    pub cos: f64,
    /// Direction sine (sin of the angle from global X)
    pub sin: f64,
}

impl RefFrame {
    pub fn from_direction(dx: f64, dy: f64) -> Self {
        let length = (dx * dx + dy * dy).sqrt();
        Self {
            cos: dx / length,
            sin: dy / length,
        }
    }

    /// Unit vector along the element
    pub fn i_versor(&self) -> [f64; 2] {
        [self.cos, self.sin]
    }

    /// Unit vector normal to the element
    pub fn j_versor(&self) -> [f64; 2] {
        [-self.sin, self.cos]
    }

    /// Project a global vector onto the local axes
    pub fn project_global(&self, x: f64, y: f64) -> [f64; 2] {
        [
            x * self.cos + y * self.sin,
            -x * self.sin + y * self.cos,
        ]
    }

    /// Express a local vector in global components
    pub fn to_global(&self, x: f64, y: f64) -> [f64; 2] {
        [
            x * self.cos - y * self.sin,
            x * self.sin + y * self.cos,
        ]
    }
}

/// Straight segment between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    pub fn ref_frame(&self) -> RefFrame {
        RefFrame::from_direction(self.end.x - self.start.x, self.end.y - self.start.y)
    }

    /// Point at parameter `t` (0 at start, 1 at end)
    pub fn point_at(&self, t: f64) -> Point {
        Point::new(
            self.start.x + t * (self.end.x - self.start.x),
            self.start.y + t * (self.end.y - self.start.y),
        )
    }

    /// Canonical ordering: start points, then end points, lexicographically
    pub fn canonical_cmp(&self, other: &Segment) -> Ordering {
        self.start
            .lexicographic_cmp(&other.start)
            .then_with(|| self.end.lexicographic_cmp(&other.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_relative_eq!(a.distance_to(&b), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ref_frame_projection_round_trip() {
        let frame = Segment::new(Point::new(0.0, 0.0), Point::new(3.0, 4.0)).ref_frame();
        let local = frame.project_global(10.0, 0.0);
        assert_relative_eq!(local[0], 6.0, epsilon = 1e-12);
        assert_relative_eq!(local[1], -8.0, epsilon = 1e-12);

        let global = frame.to_global(local[0], local[1]);
        assert_relative_eq!(global[0], 10.0, epsilon = 1e-12);
        assert_relative_eq!(global[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_vertical_frame_normal_points_to_negative_x() {
        let frame = Segment::new(Point::new(0.0, 0.0), Point::new(0.0, 2.0)).ref_frame();
        let j = frame.j_versor();
        assert_relative_eq!(j[0], -1.0, epsilon = 1e-12);
        assert_relative_eq!(j[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_canonical_ordering() {
        let a = Segment::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        let b = Segment::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        let c = Segment::new(Point::new(-1.0, 5.0), Point::new(0.0, 0.0));
        assert_eq!(a.canonical_cmp(&b), Ordering::Less);
        assert_eq!(c.canonical_cmp(&a), Ordering::Less);
        assert_eq!(a.point_at(0.5), Point::new(0.5, 0.0));
    }
}
