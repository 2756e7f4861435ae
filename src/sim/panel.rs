use crate::error::FieldError;
use crate::geom::plane::Plane;
use crate::{Point, Vector};

/// A square flat mirror.
///
/// The panel is oriented so that its normal bisects the direction toward the sun
/// and the direction toward the collector focus, which is the condition for a
/// specular reflection of sunlight to land on the focus.
///
/// The hit footprint is the axis-aligned square `[x +/- length/2] x [y +/- length/2]`
/// in the global frame, even when the plane itself is tilted.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    center: Point,
    plane: Plane,
    normal: Vector,
    length: f64,
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
    /// Sunlight intercepted by this panel (W), see `FieldSimulation::assign_panel_power()`.
    pub incident_power: f64,
}

impl Panel {
    /// Creates a panel at `center` aimed so that light arriving from `sun_direction`
    /// is reflected toward `focus`.
    ///
    /// `normal = normalize(normalize(sun_direction) + normalize(focus - center))`.
    /// Fails with `DegenerateGeometry` if the focus coincides with the center, if
    /// `sun_direction` is zero, or if the two directions are opposite.
    pub fn new(
        center: Point,
        sun_direction: Vector,
        focus: Point,
        length: f64,
    ) -> Result<Self, FieldError> {
        let normal = bisector_normal(center, sun_direction, focus)?;
        Ok(Self::with_normal(center, normal, length))
    }

    /// Creates a panel with an explicit unit normal.
    pub fn with_normal(center: Point, normal: Vector, length: f64) -> Self {
        let half = length / 2.0;
        Self {
            center,
            plane: Plane::from_normal_and_point(normal, center),
            normal,
            length,
            min_x: center.x - half,
            max_x: center.x + half,
            min_y: center.y - half,
            max_y: center.y + half,
            incident_power: 0.0,
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    pub fn normal(&self) -> Vector {
        self.normal
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Mirror area (`length^2`).
    pub fn area(&self) -> f64 {
        self.length.powi(2)
    }

    /// Returns (min_x, max_x, min_y, max_y) of the footprint.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (self.min_x, self.max_x, self.min_y, self.max_y)
    }

    /// Checks whether (pt.x, pt.y) falls inside the footprint (boundary included).
    pub fn contains_xy(&self, pt: Point) -> bool {
        pt.x >= self.min_x && pt.x <= self.max_x && pt.y >= self.min_y && pt.y <= self.max_y
    }

    /// Tilt of the panel from horizontal, in degrees.
    pub fn tilt(&self) -> f64 {
        self.normal.angle(Vector::up()).to_degrees()
    }

    /// Footprint corners lifted onto the panel plane, counter-clockwise from (+x, +y).
    ///
    /// None for vertical panels (the plane has no z for a given x, y).
    pub fn corners(&self) -> Option<[Point; 4]> {
        let xy = [
            (self.max_x, self.max_y),
            (self.min_x, self.max_y),
            (self.min_x, self.min_y),
            (self.max_x, self.min_y),
        ];
        let mut corners = [Point::default(); 4];
        for (corner, (x, y)) in corners.iter_mut().zip(xy) {
            *corner = Point::new(x, y, self.plane.z_at(x, y)?);
        }
        Some(corners)
    }
}

/// Unit normal bisecting the sun direction and the direction `center -> focus`.
pub fn bisector_normal(
    center: Point,
    sun_direction: Vector,
    focus: Point,
) -> Result<Vector, FieldError> {
    let to_sun = sun_direction
        .normalize()
        .ok_or(FieldError::DegenerateGeometry("sun direction has zero length"))?;
    let to_focus = (focus - center)
        .normalize()
        .ok_or(FieldError::DegenerateGeometry("panel center coincides with focus"))?;
    (to_sun + to_focus)
        .normalize()
        .ok_or(FieldError::DegenerateGeometry(
            "sun and focus directions are opposite",
        ))
}
