use crate::geom::EPS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// A displacement or direction.
///
/// Structurally identical to [`crate::Point`], kept as a separate type so that
/// positions and directions cannot be mixed up.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

impl Vector {
    pub fn new(dx: f64, dy: f64, dz: f64) -> Self {
        Self { dx, dy, dz }
    }

    /// Unit vector pointing up (+z).
    pub fn up() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }

    /// Dot product between 2 vectors.
    pub fn dot(self, other: Self) -> f64 {
        self.dx * other.dx + self.dy * other.dy + self.dz * other.dz
    }

    /// Returns the length of the vector.
    pub fn length(&self) -> f64 {
        (self.dx.powi(2) + self.dy.powi(2) + self.dz.powi(2)).sqrt()
    }

    pub fn is_close(&self, other: &Self) -> bool {
        (self.dx - other.dx).abs() < EPS
            && (self.dy - other.dy).abs() < EPS
            && (self.dz - other.dz).abs() < EPS
    }

    /// Same as `is_close()` but with a caller-provided tolerance.
    pub fn is_close_within(&self, other: &Self, tol: f64) -> bool {
        (self.dx - other.dx).abs() < tol
            && (self.dy - other.dy).abs() < tol
            && (self.dz - other.dz).abs() < tol
    }

    /// Normalizes the vector (divides by its length) and returns a copy.
    pub fn normalize(&self) -> Option<Self> {
        let len = self.length();
        if len < EPS {
            None
        } else {
            Some(Self {
                dx: self.dx / len,
                dy: self.dy / len,
                dz: self.dz / len,
            })
        }
    }

    /// Angle between two vectors in radians.
    ///
    /// Rounding can push the cosine slightly above 1 for (anti)parallel vectors;
    /// it is clamped so that such pairs give exactly 0 (or pi).
    /// Returns 0 if either vector has zero length.
    pub fn angle(self, other: Self) -> f64 {
        let lengths = self.length() * other.length();
        if lengths < EPS {
            return 0.0;
        }
        let cos = self.dot(other) / lengths;
        if cos > 1.0 {
            return 0.0;
        }
        cos.max(-1.0).acos()
    }

    /// Projection of `self` onto `other`: `other * (self.other / other.other)`.
    ///
    /// Returns None if `other` has zero length.
    pub fn project_onto(self, other: Self) -> Option<Self> {
        let denom = other.dot(other);
        if denom < EPS {
            None
        } else {
            Some(other * (self.dot(other) / denom))
        }
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(2); // Default 2 decimals
        write!(
            f,
            "Vector({:.prec$}, {:.prec$}, {:.prec$})",
            self.dx,
            self.dy,
            self.dz,
            prec = prec
        )
    }
}

// Implement +
impl Add for Vector {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            dx: self.dx + other.dx,
            dy: self.dy + other.dy,
            dz: self.dz + other.dz,
        }
    }
}

// Implement -
impl Sub for Vector {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            dx: self.dx - other.dx,
            dy: self.dy - other.dy,
            dz: self.dz - other.dz,
        }
    }
}

// Implement unary -
impl Neg for Vector {
    type Output = Self;
    fn neg(self) -> Self {
        self * -1.0
    }
}

// Implement *
impl Mul<f64> for Vector {
    type Output = Self;
    fn mul(self, other: f64) -> Self {
        Self {
            dx: self.dx * other,
            dy: self.dy * other,
            dz: self.dz * other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_normalize() {
        // Non-zero-length vector
        let v = Vector::new(9., 0., 0.);
        let vnorm = v.normalize();
        assert!(vnorm.is_some());
        assert_eq!(vnorm.unwrap(), Vector::new(1., 0., 0.));
        // Zero-length vector
        let v = Vector::new(0., 0., 0.);
        assert!(v.normalize().is_none());
    }

    #[test]
    fn test_angle() {
        let vx = Vector::new(1., 0., 0.);
        let vy = Vector::new(0., 2., 0.);
        assert!((vx.angle(vy) - PI / 2.0).abs() < 1e-12);
        assert!((vx.angle(-vx) - PI).abs() < 1e-12);
    }

    #[test]
    fn test_angle_parallel_is_finite() {
        let v = Vector::new(0.1, 0.7, 0.3);
        let angle = v.angle(v * 3.0);
        assert!(angle.is_finite());
        assert!(angle < 1e-7);
        assert_eq!(v.angle(Vector::default()), 0.0);
    }

    #[test]
    fn test_project_onto() {
        let a = Vector::new(2., 3., 4.);
        let b = Vector::new(0., 0., 2.);
        let p = a.project_onto(b).unwrap();
        assert!(p.is_close(&Vector::new(0., 0., 4.)));
        assert!(a.project_onto(Vector::default()).is_none());
    }

    #[test]
    fn test_ops() {
        let a = Vector::new(1., 2., 3.);
        let b = Vector::new(1., 1., 1.);
        assert_eq!(a + b, Vector::new(2., 3., 4.));
        assert_eq!(a - b, Vector::new(0., 1., 2.));
        assert_eq!(-a, Vector::new(-1., -2., -3.));
        assert!((a.dot(b) - 6.0).abs() < 1e-12);
    }
}
