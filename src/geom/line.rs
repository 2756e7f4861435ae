//! Parametric lines.

use crate::{Point, Vector};
use serde::{Deserialize, Serialize};

/// A line defined by an anchor point and a direction vector.
///
/// `point_at(t) = point + t * direction`. Unlike a half-line, `t` is unbounded
/// in both directions and the direction is kept as given (not normalized).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Anchor point of the line
    pub point: Point,
    /// Direction vector
    pub direction: Vector,
}

impl Line {
    pub fn new(point: Point, direction: Vector) -> Self {
        Self { point, direction }
    }

    /// Creates a line through two points, directed from `origin` to `target`.
    pub fn from_points(origin: Point, target: Point) -> Self {
        Self::new(origin, target - origin)
    }

    /// Returns the point along the line at parameter t.
    pub fn point_at(&self, t: f64) -> Point {
        self.point + self.direction * t
    }
}
