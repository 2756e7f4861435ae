//! Time-of-day sweeps with a lumped collector temperature.
//!
//! Every step the collector gains `rate * dt` and loses heat to the ambient air
//! by Newton cooling, `dT = [r - k * (T_prev + r * dt - T_amb)] * dt` with `dt`
//! in seconds.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::SimulationConfig;
use super::layout::LayoutMode;
use super::power::PowerEstimate;
use super::simulation::FieldSimulation;

/// Constant ambient temperature (deg C).
pub const AMBIENT_TEMPERATURE: f64 = 45.0;
/// Cooling constant (1/s) of the fixed-field sweep and of `SweepParams::new`.
pub const COOLING_CONSTANT: f64 = 0.005;
/// Cooling constant (1/s) of the fresh sweep, 0.05 per minute.
pub const FRESH_COOLING_CONSTANT: f64 = 0.05 / 60.0;
/// Measured collector temperature (deg C) the fixed sweep starts from.
pub const FIXED_INITIAL_TEMPERATURE: f64 = 39.7;

/// Time range and thermal parameters of a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepParams {
    /// First time (h). Panels are set up for this time in a fixed sweep.
    pub start: f64,
    /// Last time (h), inclusive.
    pub end: f64,
    /// Step (h).
    pub step: f64,
    pub cooling_constant: f64,
    pub ambient_temperature: f64,
    pub initial_temperature: f64,
}

impl SweepParams {
    /// Starts at ambient temperature with `COOLING_CONSTANT`.
    pub fn new(start: f64, end: f64, step: f64) -> Self {
        Self {
            start,
            end,
            step,
            cooling_constant: COOLING_CONSTANT,
            ambient_temperature: AMBIENT_TEMPERATURE,
            initial_temperature: AMBIENT_TEMPERATURE,
        }
    }

    /// Defaults for `sweep_fresh`: ambient start, slow cooling.
    pub fn fresh(start: f64, end: f64, step: f64) -> Self {
        Self {
            cooling_constant: FRESH_COOLING_CONSTANT,
            ..Self::new(start, end, step)
        }
    }

    /// Defaults for `sweep_fixed`, calibrated against a measured run.
    pub fn fixed(start: f64, end: f64, step: f64) -> Self {
        Self {
            initial_temperature: FIXED_INITIAL_TEMPERATURE,
            ..Self::new(start, end, step)
        }
    }

    /// Sample times from `start` to `end` inclusive.
    pub fn times(&self) -> Result<Vec<f64>> {
        if !(self.step.is_finite() && self.step > 0.0) {
            bail!("Sweep step must be positive, got {}", self.step);
        }
        if self.end < self.start {
            bail!("Sweep end {} is before start {}", self.end, self.start);
        }
        let count = ((self.end - self.start) / self.step + 1e-9).floor() as usize + 1;
        Ok((0..count)
            .map(|i| self.start + i as f64 * self.step)
            .collect())
    }

    /// Step length in seconds.
    fn dt(&self) -> f64 {
        self.step * 3600.0
    }
}

/// One point of a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepSample {
    /// h
    pub time: f64,
    /// Delivered power (W).
    pub power: f64,
    /// K/s
    pub temperature_rate: f64,
    /// Collector temperature after this step (deg C).
    pub temperature: f64,
}

/// Temperature change over `dt` seconds, see the module docs.
pub fn newton_step(previous: f64, rate: f64, dt: f64, cooling: f64, ambient: f64) -> f64 {
    (rate - cooling * (previous + rate * dt - ambient)) * dt
}

/// Accumulates samples and the running temperature.
struct Integrator {
    params: SweepParams,
    temperature: f64,
    samples: Vec<SweepSample>,
}

impl Integrator {
    fn new(params: SweepParams) -> Self {
        Self {
            params,
            temperature: params.initial_temperature,
            samples: Vec::new(),
        }
    }

    fn push(&mut self, time: f64, estimate: &PowerEstimate) {
        let rate = estimate.temperature_rate;
        self.temperature += newton_step(
            self.temperature,
            rate,
            self.params.dt(),
            self.params.cooling_constant,
            self.params.ambient_temperature,
        );
        debug!("t = {:.3} h: {:.3} W, {:.2} deg C", time, estimate.total_power, self.temperature);
        self.samples.push(SweepSample {
            time,
            power: estimate.total_power,
            temperature_rate: rate,
            temperature: self.temperature,
        });
    }
}

/// Re-builds the whole field for every time step (mirrors tracking the sun).
pub fn sweep_fresh(
    config: &SimulationConfig,
    mode: LayoutMode,
    params: &SweepParams,
) -> Result<Vec<SweepSample>> {
    let mut integrator = Integrator::new(*params);
    for t in params.times()? {
        let mut step_config = config.clone();
        step_config.time = t;
        let mut sim = FieldSimulation::new(step_config)?;
        sim.layout(mode)?;
        let estimate = sim
            .generate()
            .with_context(|| format!("Simulation failed at t = {t:.3} h"))?;
        integrator.push(t, &estimate);
    }
    Ok(integrator.samples)
}

/// Keeps one field and re-aims the mirrors every `every` steps.
pub fn sweep_readjusted(
    config: &SimulationConfig,
    mode: LayoutMode,
    params: &SweepParams,
    every: usize,
) -> Result<Vec<SweepSample>> {
    if every == 0 {
        bail!("Readjustment interval must be at least one step");
    }
    let mut sim = FieldSimulation::new(config.clone())?;
    let mut integrator = Integrator::new(*params);
    for (i, t) in params.times()?.into_iter().enumerate() {
        sim.set_time(t);
        if i % every == 0 {
            sim.clear_layout();
            sim.layout(mode)?;
        }
        let estimate = sim
            .generate()
            .with_context(|| format!("Simulation failed at t = {t:.3} h"))?;
        integrator.push(t, &estimate);
        sim.clear_run_data();
    }
    Ok(integrator.samples)
}

/// Aims the mirrors once at `params.start` and leaves them fixed.
pub fn sweep_fixed(
    config: &SimulationConfig,
    mode: LayoutMode,
    params: &SweepParams,
) -> Result<Vec<SweepSample>> {
    let mut setup = config.clone();
    setup.time = params.start;
    let mut sim = FieldSimulation::new(setup)?;
    let panels = sim.layout(mode)?;
    debug!("Fixed sweep with {} panels", panels);

    let mut integrator = Integrator::new(*params);
    for t in params.times()? {
        sim.set_time(t);
        let estimate = sim
            .generate()
            .with_context(|| format!("Simulation failed at t = {t:.3} h"))?;
        integrator.push(t, &estimate);
        sim.clear_run_data();
    }
    Ok(integrator.samples)
}
