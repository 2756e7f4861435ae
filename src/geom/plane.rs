use crate::geom::EPS;
use crate::{Point, Vector};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Plane `a*x + b*y + c*z = d`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Plane {
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    /// Plane with the given normal passing through `point`.
    pub fn from_normal_and_point(normal: Vector, point: Point) -> Self {
        let d = normal.dx * point.x + normal.dy * point.y + normal.dz * point.z;
        Self::new(normal.dx, normal.dy, normal.dz, d)
    }

    /// Normal vector built from the coefficients (not normalized).
    pub fn normal(&self) -> Vector {
        Vector::new(self.a, self.b, self.c)
    }

    /// Returns z of the plane at (x, y).
    ///
    /// None for planes containing the z axis direction (c == 0).
    pub fn z_at(&self, x: f64, y: f64) -> Option<f64> {
        if self.c.abs() < EPS {
            return None;
        }
        Some((self.d - self.a * x - self.b * y) / self.c)
    }

    /// Signed residual `a*x + b*y + c*z - d` (zero for points on the plane).
    pub fn residual(&self, pt: Point) -> f64 {
        self.a * pt.x + self.b * pt.y + self.c * pt.z - self.d
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(2);
        write!(
            f,
            "{:.prec$}x + {:.prec$}y + {:.prec$}z = {:.prec$}",
            self.a,
            self.b,
            self.c,
            self.d,
            prec = prec
        )
    }
}
