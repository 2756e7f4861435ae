use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::Point;
use crate::error::FieldError;

/// Parameters shared by the panel layout strategies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Radius of the innermost ring (m).
    pub r_min: f64,
    /// Rings are placed while `r < r_max` (m).
    pub r_max: f64,
    /// Side length of each square panel (m).
    pub panel_size: f64,
    /// Nominal distance between neighbouring panels (m).
    pub panel_pitch: f64,
    /// Height gained by each successive ring (m).
    pub z_step: f64,
    /// Height of the first ring (m).
    pub base_z: f64,
}

impl LayoutParams {
    pub fn new() -> Self {
        Self {
            r_min: 0.2,
            r_max: 0.6,
            panel_size: 0.05,
            panel_pitch: 0.13,
            z_step: 0.0,
            base_z: 0.0,
        }
    }

    /// Height of the outermost ring, `base_z + z_step * (r_max - r_min) / pitch`.
    pub fn top_z(&self) -> f64 {
        self.base_z + self.z_step * ((self.r_max - self.r_min) / self.panel_pitch)
    }
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self::new()
    }
}

/// Thermal properties of the collector body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorMaterial {
    /// kg
    pub mass: f64,
    /// J/(kg K)
    pub specific_heat: f64,
    /// kg/m^3, carried for completeness; the heating rate does not use it.
    pub density: f64,
}

impl CollectorMaterial {
    pub fn new() -> Self {
        Self {
            mass: 0.3,
            specific_heat: 4186.0,
            density: 2710.0,
        }
    }
}

impl Default for CollectorMaterial {
    fn default() -> Self {
        Self::new()
    }
}

/// A complete scenario: sun time, collector box, sampling resolution and layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Time of day in fractional hours.
    pub time: f64,
    /// Center of the collector box, also the focus all panels aim at.
    pub collector_center: Point,
    /// Collector extents along x, y and z.
    pub collector_dimensions: Point,
    /// Number of sampling steps along each axis of the ray grid.
    pub resolution: usize,
    pub layout: LayoutParams,
    pub material: CollectorMaterial,
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self {
            time: 12.0,
            collector_center: Point::new(0.0, 0.0, 0.8),
            collector_dimensions: Point::new(0.1, 0.1, 0.1),
            resolution: 100,
            layout: LayoutParams::new(),
            material: CollectorMaterial::new(),
        }
    }

    /// Checks that the scenario can be simulated.
    pub fn validate(&self) -> Result<(), FieldError> {
        if !self.time.is_finite() {
            return Err(FieldError::InvalidConfig(format!(
                "time must be finite, got {}",
                self.time
            )));
        }
        if self.resolution == 0 {
            return Err(FieldError::InvalidConfig(
                "resolution must be at least 1".to_string(),
            ));
        }
        let dims = self.collector_dimensions;
        if [dims.x, dims.y, dims.z].iter().any(|v| !is_positive(*v)) {
            return Err(FieldError::InvalidConfig(format!(
                "collector dimensions must be positive, got {dims}"
            )));
        }
        let layout = &self.layout;
        for (name, value) in [
            ("panel_size", layout.panel_size),
            ("panel_pitch", layout.panel_pitch),
        ] {
            if !is_positive(value) {
                return Err(FieldError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if layout.r_min.is_nan()
            || layout.r_min < 0.0
            || !layout.r_max.is_finite()
            || layout.r_max <= layout.r_min
        {
            return Err(FieldError::InvalidConfig(format!(
                "ring radii must satisfy 0 <= r_min < r_max, got {} and {}",
                layout.r_min, layout.r_max
            )));
        }
        Ok(())
    }

    /// Parses and validates a scenario given as JSON.
    ///
    /// Missing fields take their default values.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s).context("Failed to parse scenario JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a scenario from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file: {}", path.display()))?;
        Self::from_json_str(&s)
            .with_context(|| format!("Invalid scenario file: {}", path.display()))
    }
}

fn is_positive(value: f64) -> bool {
    !value.is_nan() && value > 0.0
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = SimulationConfig::new();
        assert_eq!(config.resolution, 100);
        assert_eq!(config.material.mass, 0.3);
        assert_eq!(config.material.specific_heat, 4186.0);
        assert_eq!(config.material.density, 2710.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_top_z() {
        let mut params = LayoutParams::new();
        params.z_step = 0.01;
        params.base_z = 0.5;
        // (0.6 - 0.2) / 0.13 rings worth of z steps
        let expected = 0.5 + 0.01 * (0.4 / 0.13);
        assert!((params.top_z() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = SimulationConfig::new();
        config.resolution = 0;
        assert!(matches!(
            config.validate(),
            Err(FieldError::InvalidConfig(_))
        ));

        let mut config = SimulationConfig::new();
        config.layout.panel_pitch = 0.0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::new();
        config.layout.r_max = config.layout.r_min;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::new();
        config.layout.r_min = -0.3;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::new();
        config.layout.r_max = f64::INFINITY;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::new();
        config.collector_dimensions.y = -1.0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::new();
        config.layout.panel_size = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let json = r#"{
            "time": 10.5,
            "resolution": 40,
            "layout": {
                "r_min": 0.1, "r_max": 0.5, "panel_size": 0.04,
                "panel_pitch": 0.1, "z_step": 0.0, "base_z": 0.0
            }
        }"#;
        let config = SimulationConfig::from_json_str(json).unwrap();
        assert_eq!(config.time, 10.5);
        assert_eq!(config.resolution, 40);
        assert_eq!(config.layout.r_max, 0.5);
        // Not given -> default
        assert_eq!(config.material, CollectorMaterial::new());
        assert_eq!(config.collector_center, Point::new(0.0, 0.0, 0.8));
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(SimulationConfig::from_json_str("{ not json").is_err());
        assert!(SimulationConfig::from_json_str(r#"{ "resolution": 0 }"#).is_err());
    }

    #[test]
    fn test_from_json_file_missing() {
        let path = Path::new("/nonexistent/heliofield/scenario.json");
        let err = SimulationConfig::from_json_file(path).unwrap_err();
        assert!(err.to_string().contains("Failed to read scenario file"));
    }

    #[test]
    fn test_json_round_trip_through_file() {
        let dir = std::env::temp_dir().join("heliofield_config_test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("scenario.json");
        let mut config = SimulationConfig::new();
        config.time = 9.25;
        fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = SimulationConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
