pub mod line;
pub mod plane;
pub mod point;
pub mod vector;

use crate::error::FieldError;
use line::Line;
use plane::Plane;
use point::Point;

/// Geometric precision
pub const EPS: f64 = 1e-13;

/// Denominators below this value make a line/plane intersection undefined.
const PARALLEL_EPS: f64 = 1e-10;

/// Intersects an (infinite) line with a plane.
///
/// Solves `plane.a*x + plane.b*y + plane.c*z = plane.d` for the line parameter `t`
/// and returns `line.point_at(t)`. The parameter may be negative, i.e. the intersection
/// can lie behind the line's anchor point.
///
/// Returns `FieldError::DegenerateGeometry` when the line direction is orthogonal
/// to the plane normal (no unique intersection).
pub fn intersect(line: &Line, plane: &Plane) -> Result<Point, FieldError> {
    let normal = plane.normal();
    let denom = normal.dot(line.direction);
    if denom.abs() < PARALLEL_EPS {
        return Err(FieldError::DegenerateGeometry(
            "line is parallel to the plane",
        ));
    }

    // a*(px + t*dx) + b*(py + t*dy) + c*(pz + t*dz) = d
    let p = line.point;
    let t = (plane.d - plane.a * p.x - plane.b * p.y - plane.c * p.z) / denom;

    Ok(line.point_at(t))
}

/// Euclidean distance between two points.
pub fn distance(p1: Point, p2: Point) -> f64 {
    (p2 - p1).length()
}

/// Point halfway between `p1` and `p2`.
pub fn midpoint(p1: Point, p2: Point) -> Point {
    (p1 + p2) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vector;

    #[test]
    fn test_intersect_horizontal_plane() {
        let line = Line::new(Point::new(1.0, 2.0, 10.0), Vector::new(0.0, 0.0, -1.0));
        let plane = Plane::new(0.0, 0.0, 1.0, 3.0);
        let p = intersect(&line, &plane).unwrap();
        assert!(p.is_close(&Point::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_intersect_behind_anchor() {
        // The line is infinite, so the plane may lie "behind" the anchor point
        let line = Line::new(Point::new(0.0, 0.0, 10.0), Vector::new(0.0, 0.0, 1.0));
        let plane = Plane::new(0.0, 0.0, 1.0, 0.0);
        let p = intersect(&line, &plane).unwrap();
        assert!(p.is_close(&Point::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_intersect_tilted_plane() {
        let normal = Vector::new(1.0, 0.0, 1.0);
        let plane = Plane::from_normal_and_point(normal, Point::new(0.0, 0.0, 1.0));
        let line = Line::new(Point::new(0.0, 0.0, 5.0), Vector::new(0.0, 0.0, -2.0));
        let p = intersect(&line, &plane).unwrap();
        assert!(p.is_close(&Point::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_intersect_parallel_is_degenerate() {
        let line = Line::new(Point::new(0.0, 0.0, 1.0), Vector::new(1.0, 1.0, 0.0));
        let plane = Plane::new(0.0, 0.0, 1.0, 0.0);
        let res = intersect(&line, &plane);
        assert!(matches!(res, Err(FieldError::DegenerateGeometry(_))));
    }

    #[test]
    fn test_distance_and_midpoint() {
        let p1 = Point::new(0.0, 0.0, 0.0);
        let p2 = Point::new(3.0, 4.0, 0.0);
        assert!((distance(p1, p2) - 5.0).abs() < 1e-12);
        assert!(midpoint(p1, p2).is_close(&Point::new(1.5, 2.0, 0.0)));
    }
}
