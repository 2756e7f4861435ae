//! Sunlight sample rays and their hit-and-reflect pipeline.
//!
//! A ray moves forward through
//! `Cast -> PanelHit -> Reflected -> CollectorHit | CollectorMiss`.
//! Each transition is only possible from the state before it, and the points a
//! state carries are valid by construction.

use crate::geom::intersect;
use crate::geom::line::Line;
use crate::{Point, Vector};

use super::collector::{Collector, CollectorFace};
use super::panel::Panel;
use super::reflection::{ReflectionModel, Specular};

/// Stage of a ray in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RayState {
    /// Travelling from the sun, no panel hit yet.
    Cast,
    /// Accepted by a panel at `panel_point`.
    PanelHit { panel_point: Point },
    /// Reflected at `panel_point` into `reflected`.
    Reflected {
        panel_point: Point,
        reflected: Vector,
    },
    /// The reflected ray enters the collector through `face` at `collector_point`.
    CollectorHit {
        panel_point: Point,
        reflected: Vector,
        collector_point: Point,
        face: CollectorFace,
    },
    /// The reflected ray does not reach the collector.
    CollectorMiss {
        panel_point: Point,
        reflected: Vector,
    },
}

/// A sample ray of sunlight.
///
/// The ray keeps the line used for intersection tests and, separately, the vector
/// it travels along. The line's direction is only used to find intersections, while
/// the travel vector decides which side of a panel the ray arrives at.
#[derive(Debug, Clone, PartialEq)]
pub struct Ray {
    origin: Point,
    line: Line,
    direction: Vector,
    state: RayState,
}

impl Ray {
    /// Creates a ray leaving `origin` along `direction`.
    pub fn cast(origin: Point, direction: Vector) -> Self {
        Self {
            origin,
            line: Line::new(origin, direction),
            direction,
            state: RayState::Cast,
        }
    }

    /// Sun-side point the ray was cast from.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Line used for the next intersection test.
    pub fn line(&self) -> &Line {
        &self.line
    }

    /// Incoming travel direction (before any reflection).
    pub fn direction(&self) -> Vector {
        self.direction
    }

    pub fn state(&self) -> &RayState {
        &self.state
    }

    pub fn is_cast(&self) -> bool {
        matches!(self.state, RayState::Cast)
    }

    pub fn hit_collector(&self) -> bool {
        matches!(self.state, RayState::CollectorHit { .. })
    }

    /// Point where the ray met a panel, if it got that far.
    pub fn panel_point(&self) -> Option<Point> {
        match self.state {
            RayState::Cast => None,
            RayState::PanelHit { panel_point }
            | RayState::Reflected { panel_point, .. }
            | RayState::CollectorHit { panel_point, .. }
            | RayState::CollectorMiss { panel_point, .. } => Some(panel_point),
        }
    }

    /// Direction after the mirror reflection, if reflected.
    pub fn reflected_direction(&self) -> Option<Vector> {
        match self.state {
            RayState::Cast | RayState::PanelHit { .. } => None,
            RayState::Reflected { reflected, .. }
            | RayState::CollectorHit { reflected, .. }
            | RayState::CollectorMiss { reflected, .. } => Some(reflected),
        }
    }

    /// Point where the reflected ray enters the collector, if it does.
    pub fn collector_point(&self) -> Option<Point> {
        match self.state {
            RayState::CollectorHit {
                collector_point, ..
            } => Some(collector_point),
            _ => None,
        }
    }

    /// Tests the ray against a panel and moves it to `PanelHit` on success.
    ///
    /// The line is intersected with the panel plane; the hit is accepted if the
    /// intersection lies within the panel footprint and the ray travels toward the
    /// panel's reflective face (`normal . direction < 0`). Only a `Cast` ray can be
    /// accepted, so the first accepting panel wins.
    pub fn hits_panel(&mut self, panel: &Panel) -> bool {
        if !self.is_cast() {
            return false;
        }
        let Ok(pt) = intersect(&self.line, panel.plane()) else {
            return false;
        };
        if panel.contains_xy(pt) && panel.normal().dot(self.direction) < 0.0 {
            self.state = RayState::PanelHit { panel_point: pt };
            true
        } else {
            false
        }
    }

    /// Reflects the ray off `panel`, which must be the panel that just accepted it.
    ///
    /// The new line starts at the panel hit point and follows `v - 2 * proj_n(v)`.
    /// Returns false (and leaves the ray untouched) unless the ray is in `PanelHit`.
    pub fn reflect(&mut self, panel: &Panel) -> bool {
        let RayState::PanelHit { panel_point } = self.state else {
            return false;
        };
        let Some(reflected) = Specular.reflect(self.direction, panel.normal()) else {
            return false;
        };
        self.line = Line::new(panel_point, reflected);
        self.state = RayState::Reflected {
            panel_point,
            reflected,
        };
        true
    }

    /// Tests the reflected ray against the collector box.
    ///
    /// Moves a `Reflected` ray to `CollectorHit` (face closest to the panel hit
    /// point) or `CollectorMiss`. Rays in any other state return false unchanged.
    pub fn hits_collector(&mut self, collector: &Collector) -> bool {
        let RayState::Reflected {
            panel_point,
            reflected,
        } = self.state
        else {
            return false;
        };
        match collector.intersect_line(&self.line, panel_point) {
            Some(hit) => {
                self.state = RayState::CollectorHit {
                    panel_point,
                    reflected,
                    collector_point: hit.point,
                    face: hit.face,
                };
                true
            }
            None => {
                self.state = RayState::CollectorMiss {
                    panel_point,
                    reflected,
                };
                false
            }
        }
    }

    /// Start point and displacement to draw this ray.
    ///
    /// Unbounded legs (before a panel, or after a missed collector) are drawn
    /// `extent` times their direction vector long.
    pub fn segment(&self, extent: f64) -> (Point, Vector) {
        match self.state {
            RayState::Cast => (self.origin, self.direction * extent),
            RayState::PanelHit { panel_point } => (self.origin, panel_point - self.origin),
            RayState::CollectorHit {
                panel_point,
                collector_point,
                ..
            } => (panel_point, collector_point - panel_point),
            RayState::Reflected {
                panel_point,
                reflected,
            }
            | RayState::CollectorMiss {
                panel_point,
                reflected,
            } => (panel_point, reflected * extent),
        }
    }
}
