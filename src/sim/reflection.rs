use crate::Vector;

/// Defines how rays reflect off panels.
pub trait ReflectionModel {
    /// Computes the reflected direction given incident direction and surface normal.
    ///
    /// Returns None when the normal has zero length.
    fn reflect(&self, incident: Vector, normal: Vector) -> Option<Vector>;
}

/// Perfect specular (mirror) reflection: `v - 2 * proj_n(v)`.
///
/// Keeps the magnitude of the incident vector and flips its component along the
/// normal. The normal does not need to be unit length.
pub struct Specular;

impl ReflectionModel for Specular {
    fn reflect(&self, incident: Vector, normal: Vector) -> Option<Vector> {
        let proj = incident.project_onto(normal)?;
        Some(incident - proj * 2.0)
    }
}
