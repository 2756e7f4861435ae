//! Solar flux and delivered power estimate.
//!
//! Two different power figures exist and must not be mixed up:
//! - `Panel::incident_power` is the sunlight falling on one panel
//!   (`flux * area * |cos|`), with no optical losses applied.
//! - `PowerEstimate::mirror_power` is what the field as a whole delivers to the
//!   collector, scaled by the fraction of panel-hit sample rays that reach it.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::Vector;

use super::collector::Collector;
use super::config::CollectorMaterial;
use super::generator::RayPopulations;
use super::panel::Panel;
use super::sun::Sun;

/// W/(m^2 K^4)
pub const STEFAN_BOLTZMANN: f64 = 5.6696e-8;
/// K
pub const SUN_TEMPERATURE: f64 = 5778.0;
/// m
pub const SUN_RADIUS: f64 = 6.9634e8;
/// m
pub const SUN_DISTANCE: f64 = 1.49597870e11;
/// Fraction of radiation reaching the ground through the atmosphere.
pub const ATMOSPHERIC_TRANSMISSION: f64 = 0.73;
/// Fraction of light passed on by a mirror.
pub const MIRROR_TRANSMISSION: f64 = 1.0;

/// Solar irradiance at the scene (W/m^2).
///
/// Black-body emission of the sun diluted by distance, projected by the angle
/// of the sun to the vertical and attenuated by the atmosphere.
pub fn solar_flux(sun: &Sun) -> f64 {
    STEFAN_BOLTZMANN
        * SUN_TEMPERATURE.powi(4)
        * (SUN_RADIUS / SUN_DISTANCE).powi(2)
        * sun.normal_angle().to_radians().cos().abs()
        * ATMOSPHERIC_TRANSMISSION
}

/// `|cos|` of the angle between `normal` and the sun direction.
fn incidence(normal: Vector, sun: &Sun) -> f64 {
    normal.angle(sun.direction()).cos().abs()
}

/// Sunlight intercepted by one panel (W): `flux * length^2 * |cos|`.
pub fn panel_incident_power(panel: &Panel, sun: &Sun, flux: f64) -> f64 {
    flux * panel.area() * incidence(panel.normal(), sun)
}

/// Stores `panel_incident_power` on every panel and returns the sum.
pub fn assign_incident_power(panels: &mut [Panel], sun: &Sun, flux: f64) -> f64 {
    let mut sum = 0.0;
    for panel in panels.iter_mut() {
        panel.incident_power = panel_incident_power(panel, sun, flux);
        sum += panel.incident_power;
    }
    sum
}

/// Direct sunlight on the three sunlit collector faces (W).
pub fn direct_power(collector: &Collector, sun: &Sun, flux: f64) -> f64 {
    collector
        .sunlit_faces()
        .iter()
        .map(|(normal, area)| area * flux * incidence(*normal, sun))
        .sum()
}

/// How much of the mirror power figure is backed by data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstimateStatus {
    /// No generation pass since construction or the last clear.
    NotRun,
    /// Mirror power computed from the ray statistics.
    Complete,
    /// No sample ray hit a panel; mirror power is zero for lack of data.
    NoPanelHits,
    /// There are no panels; mirror power is zero.
    EmptyPanelSet,
}

/// Whether the heating rate could be derived from the total power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeatingStatus {
    NotRun,
    Computed,
    /// Mass or specific heat is not positive; the heating rate is zero.
    InvalidMaterial,
}

/// Power delivered to the collector at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerEstimate {
    /// W/m^2
    pub flux: f64,
    /// Mirror power before applying the capture ratio (W).
    pub nominal_mirror_power: f64,
    /// Fraction of panel-hit rays reaching the collector, None without panel hits.
    pub capture_ratio: Option<f64>,
    /// Power reflected onto the collector (W).
    pub mirror_power: f64,
    /// Sunlight hitting the collector without a mirror (W).
    pub direct_power: f64,
    /// `mirror_power + direct_power` (W).
    pub total_power: f64,
    /// K/s
    pub temperature_rate: f64,
    /// Reason behind `mirror_power`.
    pub status: EstimateStatus,
    /// Reason behind `temperature_rate`.
    pub heating: HeatingStatus,
}

impl PowerEstimate {
    /// Estimate with every figure zero, as after clearing run data.
    pub fn empty() -> Self {
        Self {
            flux: 0.0,
            nominal_mirror_power: 0.0,
            capture_ratio: None,
            mirror_power: 0.0,
            direct_power: 0.0,
            total_power: 0.0,
            temperature_rate: 0.0,
            status: EstimateStatus::NotRun,
            heating: HeatingStatus::NotRun,
        }
    }
}

/// Combines the field geometry, the solar flux and the ray statistics into a
/// power and heating rate estimate.
///
/// Each panel is credited with an equal share `total_area / panels.len()` of
/// the mirror area. No division takes place when there are no panels or no
/// panel hits; the status tells those cases apart from a real zero.
pub fn estimate(
    sun: &Sun,
    panels: &[Panel],
    total_area: f64,
    populations: &RayPopulations,
    collector: &Collector,
    material: &CollectorMaterial,
) -> PowerEstimate {
    debug!(
        "Sun direction {}, normal angle {:.2} deg",
        sun.direction(),
        sun.normal_angle()
    );
    let flux = solar_flux(sun);

    let mut status = EstimateStatus::Complete;
    let mut nominal_mirror_power = 0.0;
    if panels.is_empty() {
        warn!("No panels in the field, mirror power is zero");
        status = EstimateStatus::EmptyPanelSet;
    } else {
        let share = total_area / panels.len() as f64;
        nominal_mirror_power = panels
            .iter()
            .map(|p| flux * share * incidence(p.normal(), sun) * MIRROR_TRANSMISSION)
            .sum();
    }

    let capture_ratio = populations.capture_ratio();
    let mirror_power = match capture_ratio {
        Some(ratio) => {
            debug!("Capture ratio {:.4}", ratio);
            nominal_mirror_power * ratio
        }
        None => {
            if status == EstimateStatus::Complete {
                warn!("No sample ray hit a panel, mirror power is zero");
                status = EstimateStatus::NoPanelHits;
            }
            0.0
        }
    };

    let direct_power = direct_power(collector, sun, flux);
    debug!("Direct power {:.3} W", direct_power);
    let total_power = mirror_power + direct_power;

    let (temperature_rate, heating) = match collector.temperature_rate(
        total_power,
        material.density,
        material.mass,
        material.specific_heat,
    ) {
        Ok(rate) => (rate, HeatingStatus::Computed),
        Err(e) => {
            warn!("Heating rate not computed: {e}");
            (0.0, HeatingStatus::InvalidMaterial)
        }
    };

    info!(
        "Power at collector {:.3} W, heating rate {:.6} K/s",
        total_power, temperature_rate
    );
    PowerEstimate {
        flux,
        nominal_mirror_power,
        capture_ratio,
        mirror_power,
        direct_power,
        total_power,
        temperature_rate,
        status,
        heating,
    }
}
