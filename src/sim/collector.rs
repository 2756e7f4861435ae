use crate::error::FieldError;
use crate::geom::line::Line;
use crate::geom::plane::Plane;
use crate::geom::{distance, intersect};
use crate::{Point, Vector};
use serde::{Deserialize, Serialize};

/// One of the six bounding faces of the collector box.
///
/// The declaration order is the evaluation order used when picking a hit face,
/// so ties are resolved in favour of the earlier face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectorFace {
    MinX,
    MaxX,
    MinY,
    MaxY,
    MinZ,
    MaxZ,
}

impl CollectorFace {
    pub const ALL: [CollectorFace; 6] = [
        CollectorFace::MinX,
        CollectorFace::MaxX,
        CollectorFace::MinY,
        CollectorFace::MaxY,
        CollectorFace::MinZ,
        CollectorFace::MaxZ,
    ];

    /// Axis index (0 = x, 1 = y, 2 = z) the face is perpendicular to.
    pub fn axis(self) -> usize {
        match self {
            CollectorFace::MinX | CollectorFace::MaxX => 0,
            CollectorFace::MinY | CollectorFace::MaxY => 1,
            CollectorFace::MinZ | CollectorFace::MaxZ => 2,
        }
    }
}

/// Point where a line enters the collector box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectorHit {
    pub face: CollectorFace,
    pub point: Point,
}

/// Axis-aligned receiver box.
#[derive(Debug, Clone, PartialEq)]
pub struct Collector {
    center: Point,
    length: f64,
    width: f64,
    height: f64,
    /// Bounding planes in `CollectorFace::ALL` order.
    planes: [Plane; 6],
}

impl Collector {
    /// Creates a box centered at `center` with extents along x (`length`),
    /// y (`width`) and z (`height`).
    pub fn new(center: Point, length: f64, width: f64, height: f64) -> Self {
        Self::from_bounds(
            Point::new(
                center.x - length / 2.0,
                center.y - width / 2.0,
                center.z - height / 2.0,
            ),
            Point::new(
                center.x + length / 2.0,
                center.y + width / 2.0,
                center.z + height / 2.0,
            ),
        )
    }

    /// Creates a box from its min and max corners.
    pub fn from_bounds(min: Point, max: Point) -> Self {
        let planes = [
            Plane::new(1.0, 0.0, 0.0, min.x),
            Plane::new(1.0, 0.0, 0.0, max.x),
            Plane::new(0.0, 1.0, 0.0, min.y),
            Plane::new(0.0, 1.0, 0.0, max.y),
            Plane::new(0.0, 0.0, 1.0, min.z),
            Plane::new(0.0, 0.0, 1.0, max.z),
        ];
        Self {
            center: (min + max) / 2.0,
            length: max.x - min.x,
            width: max.y - min.y,
            height: max.z - min.z,
            planes,
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn plane(&self, face: CollectorFace) -> &Plane {
        &self.planes[face as usize]
    }

    pub fn min(&self) -> Point {
        Point::new(
            self.plane(CollectorFace::MinX).d,
            self.plane(CollectorFace::MinY).d,
            self.plane(CollectorFace::MinZ).d,
        )
    }

    pub fn max(&self) -> Point {
        Point::new(
            self.plane(CollectorFace::MaxX).d,
            self.plane(CollectorFace::MaxY).d,
            self.plane(CollectorFace::MaxZ).d,
        )
    }

    /// The eight box corners, bottom face first.
    pub fn corners(&self) -> [Point; 8] {
        let (lo, hi) = (self.min(), self.max());
        [
            Point::new(lo.x, lo.y, lo.z),
            Point::new(hi.x, lo.y, lo.z),
            Point::new(hi.x, hi.y, lo.z),
            Point::new(lo.x, hi.y, lo.z),
            Point::new(lo.x, lo.y, hi.z),
            Point::new(hi.x, lo.y, hi.z),
            Point::new(hi.x, hi.y, hi.z),
            Point::new(lo.x, hi.y, hi.z),
        ]
    }

    /// Areas receiving direct sunlight, paired with the outward axis normals
    /// (x, y, z). The x- and y-facing areas are both `length * height`,
    /// the z-facing area is `length * width`.
    pub fn sunlit_faces(&self) -> [(Vector, f64); 3] {
        let side = self.length * self.height;
        [
            (Vector::new(1.0, 0.0, 0.0), side),
            (Vector::new(0.0, 1.0, 0.0), side),
            (Vector::new(0.0, 0.0, 1.0), self.length * self.width),
        ]
    }

    /// Intersects an (infinite) line with the box faces.
    ///
    /// An intersection with a face plane is a candidate when the two remaining
    /// coordinates lie within the box extents (boundary included). Among all
    /// candidates, the one closest to `reference` wins; equal distances keep the
    /// earlier face in `CollectorFace::ALL` order. Faces parallel to the line
    /// are skipped.
    pub fn intersect_line(&self, line: &Line, reference: Point) -> Option<CollectorHit> {
        let (lo, hi) = (self.min(), self.max());
        let lo = [lo.x, lo.y, lo.z];
        let hi = [hi.x, hi.y, hi.z];

        let mut best: Option<(f64, CollectorHit)> = None;
        for face in CollectorFace::ALL {
            let Ok(pt) = intersect(line, self.plane(face)) else {
                continue;
            };
            let coords = [pt.x, pt.y, pt.z];
            let inside = (0..3)
                .filter(|&axis| axis != face.axis())
                .all(|axis| coords[axis] >= lo[axis] && coords[axis] <= hi[axis]);
            if !inside {
                continue;
            }

            let dist = distance(reference, pt);
            match best {
                Some((best_dist, _)) if dist >= best_dist => {}
                _ => best = Some((dist, CollectorHit { face, point: pt })),
            }
        }

        best.map(|(_, hit)| hit)
    }

    /// Heating rate (K/s) of the collector receiving `power` watts.
    ///
    /// `rate = power / (mass * specific_heat)`. `density` is accepted but does not
    /// enter the formula.
    pub fn temperature_rate(
        &self,
        power: f64,
        _density: f64,
        mass: f64,
        specific_heat: f64,
    ) -> Result<f64, FieldError> {
        for (name, value) in [("mass", mass), ("specific_heat", specific_heat)] {
            if value.is_nan() || value <= 0.0 {
                return Err(FieldError::InvalidPhysicalParameter { name, value });
            }
        }
        Ok(power / mass / specific_heat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Collector {
        Collector::new(Point::new(0.0, 0.0, 0.0), 2.0, 2.0, 2.0)
    }

    #[test]
    fn test_bounds() {
        let c = Collector::new(Point::new(1.0, 2.0, 3.0), 2.0, 4.0, 6.0);
        assert!(c.min().is_close(&Point::new(0.0, 0.0, 0.0)));
        assert!(c.max().is_close(&Point::new(2.0, 4.0, 6.0)));
        assert!((c.height() - 6.0).abs() < 1e-12);

        let c2 = Collector::from_bounds(Point::new(0.0, 0.0, 0.0), Point::new(2.0, 4.0, 6.0));
        assert!(c2.center().is_close(&Point::new(1.0, 2.0, 3.0)));
        assert_eq!(c2.corners()[6], Point::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn test_vertical_line_hits_top_face() {
        let c = unit_box();
        let line = Line::new(Point::new(0.0, 0.0, 5.0), Vector::new(0.0, 0.0, -1.0));
        let hit = c.intersect_line(&line, Point::new(0.0, 0.0, 5.0)).unwrap();
        assert_eq!(hit.face, CollectorFace::MaxZ);
        assert!(hit.point.is_close(&Point::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_reference_point_selects_face() {
        // Same line, reference below the box -> bottom face is closer
        let c = unit_box();
        let line = Line::new(Point::new(0.0, 0.0, 5.0), Vector::new(0.0, 0.0, -1.0));
        let hit = c.intersect_line(&line, Point::new(0.0, 0.0, -7.0)).unwrap();
        assert_eq!(hit.face, CollectorFace::MinZ);
    }

    #[test]
    fn test_tie_keeps_first_face() {
        // Line through the (+x, +z) edge region: reference equidistant from both hits
        let c = unit_box();
        let line = Line::new(Point::new(1.0, 0.0, 1.0), Vector::new(1.0, 0.0, -1.0));
        // Intersections: x=-1 -> z=3 (outside), x=1 -> (1,0,1), z=-1 -> x=3 (outside),
        // z=1 -> (1,0,1). Both candidates coincide, MaxX comes first.
        let hit = c.intersect_line(&line, Point::new(5.0, 0.0, -3.0)).unwrap();
        assert_eq!(hit.face, CollectorFace::MaxX);
    }

    #[test]
    fn test_line_missing_box() {
        let c = unit_box();
        let line = Line::new(Point::new(5.0, 5.0, 5.0), Vector::new(0.0, 0.0, -1.0));
        assert!(c.intersect_line(&line, Point::new(5.0, 5.0, 5.0)).is_none());
    }

    #[test]
    fn test_temperature_rate() {
        let c = unit_box();
        let rate = c.temperature_rate(418.6, 2710.0, 0.1, 4186.0).unwrap();
        assert!((rate - 1.0).abs() < 1e-12);
        // Density does not change the result
        let rate2 = c.temperature_rate(418.6, 1.0, 0.1, 4186.0).unwrap();
        assert_eq!(rate, rate2);
    }

    #[test]
    fn test_temperature_rate_rejects_bad_parameters() {
        let c = unit_box();
        assert!(matches!(
            c.temperature_rate(1.0, 1.0, 0.0, 4186.0),
            Err(FieldError::InvalidPhysicalParameter { name: "mass", .. })
        ));
        assert!(matches!(
            c.temperature_rate(1.0, 1.0, 0.3, -2.0),
            Err(FieldError::InvalidPhysicalParameter {
                name: "specific_heat",
                ..
            })
        ));
    }

    #[test]
    fn test_sunlit_faces() {
        let c = Collector::new(Point::default(), 2.0, 3.0, 4.0);
        let faces = c.sunlit_faces();
        assert!((faces[0].1 - 8.0).abs() < 1e-12);
        assert!((faces[1].1 - 8.0).abs() < 1e-12);
        assert!((faces[2].1 - 6.0).abs() < 1e-12);
    }
}
