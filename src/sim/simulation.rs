use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::FieldError;

use super::collector::Collector;
use super::config::SimulationConfig;
use super::generator::{RayCounts, RayPopulations, generate_rays, sampling_bounds};
use super::layout::{Layout, LayoutMode, LayoutStrategy};
use super::panel::Panel;
use super::power::{self, EstimateStatus, HeatingStatus, PowerEstimate, solar_flux};
use super::sun::Sun;

/// Snapshot of one generation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub time: f64,
    pub panel_count: usize,
    /// Effective mirror area (m^2).
    pub total_area: f64,
    pub rays: RayCounts,
    pub ray_total: usize,
    /// W/m^2
    pub flux: f64,
    pub capture_ratio: Option<f64>,
    pub mirror_power: f64,
    pub direct_power: f64,
    pub total_power: f64,
    /// K/s
    pub temperature_rate: f64,
    /// Sum of `Panel::incident_power` (W), zero until panel powers are assigned.
    pub incident_power: f64,
    pub status: EstimateStatus,
    pub heating: HeatingStatus,
}

/// One mirror field scenario: the sun, the collector, the panels laid out
/// around it and the results of the last generation pass.
///
/// Layouts accumulate: call `clear_layout()` before laying out again. Run data
/// is replaced by every `generate()` and reset by `clear_run_data()`.
pub struct FieldSimulation {
    config: SimulationConfig,
    sun: Sun,
    collector: Collector,
    panels: Vec<Panel>,
    total_area: f64,
    populations: RayPopulations,
    estimate: PowerEstimate,
}

impl FieldSimulation {
    /// Builds the sun and the collector described by `config`. No panels yet.
    pub fn new(config: SimulationConfig) -> Result<Self, FieldError> {
        config.validate()?;
        let dims = config.collector_dimensions;
        let collector = Collector::new(config.collector_center, dims.x, dims.y, dims.z);
        Ok(Self {
            sun: Sun::new(config.time),
            collector,
            panels: Vec::new(),
            total_area: 0.0,
            populations: RayPopulations::new(),
            estimate: PowerEstimate::empty(),
            config,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Lays out panels with one of the built-in strategies. Returns the number
    /// of panels added.
    pub fn layout(&mut self, mode: LayoutMode) -> Result<usize, FieldError> {
        let strategy = LayoutStrategy::from_mode(mode, &self.config.layout);
        self.layout_with(&strategy)
    }

    /// Lays out panels with an arbitrary strategy, each aimed at the collector
    /// center for the current sun.
    pub fn layout_with(&mut self, strategy: &LayoutStrategy) -> Result<usize, FieldError> {
        let layout = Layout::build(
            strategy,
            self.sun.direction(),
            self.collector.center(),
            self.config.layout.panel_size,
        )?;
        let added = layout.panels.len();
        self.panels.extend(layout.panels);
        self.total_area += layout.total_area;
        info!(
            "{} panels laid out ({} in total, mirror area {:.4} m^2)",
            added,
            self.panels.len(),
            self.total_area
        );
        Ok(added)
    }

    /// Casts the sample rays over the field and estimates the delivered power.
    ///
    /// An empty field is not an error: the estimate then reports
    /// `EstimateStatus::EmptyPanelSet`.
    pub fn generate(&mut self) -> Result<PowerEstimate, FieldError> {
        let (min, max) = sampling_bounds(&self.config.layout);
        match generate_rays(
            self.config.resolution,
            min,
            max,
            &self.sun,
            &self.collector,
            &self.panels,
            self.collector.max().z,
        ) {
            Ok(populations) => self.populations = populations,
            Err(FieldError::EmptyPanelSet) => {
                warn!("No panels laid out, skipping ray generation");
                self.populations.clear();
            }
            Err(e) => return Err(e),
        }

        self.estimate = power::estimate(
            &self.sun,
            &self.panels,
            self.total_area,
            &self.populations,
            &self.collector,
            &self.config.material,
        );
        Ok(self.estimate)
    }

    /// Stores on every panel the sunlight it intercepts at the current sun
    /// position and returns the sum (W). Not scaled by the capture ratio.
    pub fn assign_panel_power(&mut self) -> f64 {
        let flux = solar_flux(&self.sun);
        power::assign_incident_power(&mut self.panels, &self.sun, flux)
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// Incident power of each panel, in layout order.
    pub fn panel_powers(&self) -> Vec<f64> {
        self.panels.iter().map(|p| p.incident_power).collect()
    }

    pub fn total_area(&self) -> f64 {
        self.total_area
    }

    /// Delivered power at the collector (W).
    pub fn total_power(&self) -> f64 {
        self.estimate.total_power
    }

    /// Collector heating rate (K/s).
    pub fn temperature_rate(&self) -> f64 {
        self.estimate.temperature_rate
    }

    pub fn flux(&self) -> f64 {
        self.estimate.flux
    }

    pub fn estimate(&self) -> &PowerEstimate {
        &self.estimate
    }

    pub fn populations(&self) -> &RayPopulations {
        &self.populations
    }

    pub fn ray_counts(&self) -> RayCounts {
        self.populations.counts()
    }

    pub fn sun(&self) -> &Sun {
        &self.sun
    }

    pub fn sun_mut(&mut self) -> &mut Sun {
        &mut self.sun
    }

    /// Moves the sun without touching the panels.
    pub fn set_time(&mut self, time: f64) {
        self.sun.set_time(time);
    }

    pub fn collector(&self) -> &Collector {
        &self.collector
    }

    /// Drops the ray populations and the power figures.
    pub fn clear_run_data(&mut self) {
        self.populations.clear();
        self.estimate = PowerEstimate::empty();
    }

    /// Drops all panels and the accumulated mirror area.
    pub fn clear_layout(&mut self) {
        self.panels.clear();
        self.total_area = 0.0;
    }

    pub fn summary(&self) -> RunSummary {
        let rays = self.ray_counts();
        RunSummary {
            time: self.sun.time(),
            panel_count: self.panels.len(),
            total_area: self.total_area,
            rays,
            ray_total: rays.total(),
            flux: self.estimate.flux,
            capture_ratio: self.estimate.capture_ratio,
            mirror_power: self.estimate.mirror_power,
            direct_power: self.estimate.direct_power,
            total_power: self.estimate.total_power,
            temperature_rate: self.estimate.temperature_rate,
            incident_power: self.panels.iter().map(|p| p.incident_power).sum(),
            status: self.estimate.status,
            heating: self.estimate.heating,
        }
    }
}
