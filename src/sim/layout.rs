//! Panel placement strategies.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::FieldError;
use crate::{Point, Vector};

use super::config::LayoutParams;
use super::panel::Panel;

/// Radial step of the ring layout is `pitch / RING_PITCH_DIVISOR`.
pub const RING_PITCH_DIVISOR: f64 = 1.3;
/// Angular step of the ring layout at radius r is `(pitch / r) * RING_ANGULAR_FACTOR`.
pub const RING_ANGULAR_FACTOR: f64 = PI / 6.0;
/// Fraction of the mirror surface not covered by mounting sheets.
pub const MIRROR_AREA_FRACTION: f64 = 0.9;

/// Which built-in strategy to derive from the scenario's layout parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    Ring,
    FixedRadius,
}

/// One ring of the fixed-radius layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedRing {
    pub radius: f64,
    /// Angle between neighbouring panels (radians).
    pub angular_step: f64,
}

/// How panels are placed around the collector axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayoutStrategy {
    /// Concentric rings from `r_min` (inclusive) to `r_max` (exclusive).
    ///
    /// Rings are `pitch / 1.3` apart; along each ring the angular step is
    /// `(pitch / r) * pi / 6`, which keeps the spacing along the ring roughly
    /// constant. Ring `i` sits at `base_z + i * z_step`.
    Ring {
        r_min: f64,
        r_max: f64,
        pitch: f64,
        z_step: f64,
        base_z: f64,
    },
    /// Explicit rings all at height `z`.
    ///
    /// The accumulated mirror area is multiplied by `area_fraction`.
    FixedRadius {
        rings: Vec<FixedRing>,
        z: f64,
        area_fraction: f64,
    },
}

impl LayoutStrategy {
    /// Builds the strategy for `mode` from scenario parameters.
    pub fn from_mode(mode: LayoutMode, params: &LayoutParams) -> Self {
        match mode {
            LayoutMode::Ring => LayoutStrategy::Ring {
                r_min: params.r_min,
                r_max: params.r_max,
                pitch: params.panel_pitch,
                z_step: params.z_step,
                base_z: params.base_z,
            },
            LayoutMode::FixedRadius => Self::fixed_radius(params.base_z),
        }
    }

    /// Three rings of radius 0.2, 0.4 and 0.6 holding 8, 16 and 24 panels.
    pub fn fixed_radius(z: f64) -> Self {
        LayoutStrategy::FixedRadius {
            rings: vec![
                FixedRing {
                    radius: 0.2,
                    angular_step: PI / 4.0,
                },
                FixedRing {
                    radius: 0.4,
                    angular_step: PI / 8.0,
                },
                FixedRing {
                    radius: 0.6,
                    angular_step: PI / 12.0,
                },
            ],
            z,
            area_fraction: MIRROR_AREA_FRACTION,
        }
    }

    /// Panel center positions produced by this strategy, in placement order.
    pub fn positions(&self) -> Result<Vec<Point>, FieldError> {
        let mut pts = Vec::new();
        match self {
            LayoutStrategy::Ring {
                r_min,
                r_max,
                pitch,
                z_step,
                base_z,
            } => {
                if pitch.is_nan() || *pitch <= 0.0 {
                    return Err(FieldError::InvalidConfig(format!(
                        "ring pitch must be positive, got {pitch}"
                    )));
                }
                // The ring loops only terminate for a finite range starting at 0 or above
                if r_min.is_nan() || *r_min < 0.0 || !r_max.is_finite() {
                    return Err(FieldError::InvalidConfig(format!(
                        "ring radii must satisfy 0 <= r_min and finite r_max, got {r_min} and {r_max}"
                    )));
                }
                let dr = pitch / RING_PITCH_DIVISOR;
                let mut z = *base_z;
                for r in steps(*r_min, dr, *r_max) {
                    let dtheta = (pitch / r) * RING_ANGULAR_FACTOR;
                    for theta in steps(0.0, dtheta, TAU) {
                        pts.push(Point::new(r * theta.cos(), r * theta.sin(), z));
                    }
                    z += z_step;
                }
            }
            LayoutStrategy::FixedRadius { rings, z, .. } => {
                for ring in rings {
                    if ring.angular_step.is_nan() || ring.angular_step <= 0.0 {
                        return Err(FieldError::InvalidConfig(format!(
                            "angular step must be positive, got {}",
                            ring.angular_step
                        )));
                    }
                    let count = (TAU / ring.angular_step).round() as usize;
                    for i in 0..count {
                        let theta = i as f64 * ring.angular_step;
                        pts.push(Point::new(
                            ring.radius * theta.cos(),
                            ring.radius * theta.sin(),
                            *z,
                        ));
                    }
                }
            }
        }
        Ok(pts)
    }

    /// Scale applied to the summed mirror area.
    pub fn area_fraction(&self) -> f64 {
        match self {
            LayoutStrategy::Ring { .. } => 1.0,
            LayoutStrategy::FixedRadius { area_fraction, .. } => *area_fraction,
        }
    }
}

/// Panels placed by a strategy together with their effective mirror area.
#[derive(Debug, Clone)]
pub struct Layout {
    pub panels: Vec<Panel>,
    /// Sum of `length^2` over all panels, times the strategy's area fraction.
    pub total_area: f64,
}

impl Layout {
    /// Places panels of side `panel_size` and aims each at `focus` for the given
    /// sun direction. Positions where the aiming is degenerate are skipped.
    pub fn build(
        strategy: &LayoutStrategy,
        sun_direction: Vector,
        focus: Point,
        panel_size: f64,
    ) -> Result<Self, FieldError> {
        let mut panels = Vec::new();
        let mut total_area = 0.0;
        for center in strategy.positions()? {
            match Panel::new(center, sun_direction, focus, panel_size) {
                Ok(panel) => {
                    total_area += panel.area();
                    panels.push(panel);
                }
                Err(e) => warn!("Skipping panel at {center}: {e}"),
            }
        }
        total_area *= strategy.area_fraction();

        Ok(Self { panels, total_area })
    }
}

/// `start, start + step, ...` (accumulated) while the value stays below `end`.
///
/// An infinite step yields `start` only, which places a single panel on a
/// ring of radius zero.
fn steps(start: f64, step: f64, end: f64) -> impl Iterator<Item = f64> {
    std::iter::successors(Some(start), move |v| Some(v + step)).take_while(move |&v| v < end)
}
