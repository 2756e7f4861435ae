//! Sampling grid of sunlight rays and their classification against the field.

use std::f64::consts::{FRAC_PI_4, PI};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::Point;
use crate::error::FieldError;
use crate::geom::intersect;
use crate::geom::line::Line;
use crate::geom::plane::Plane;

use super::collector::Collector;
use super::config::LayoutParams;
use super::panel::Panel;
use super::ray::Ray;
use super::sun::{NOON, Sun};

/// The sampling window extends this many panel lengths past the projected bounds.
pub const SAMPLING_MARGIN_PANELS: f64 = 4.0;
/// Morning sampling height is `(t - 3) / 3` collector heights.
pub const MORNING_HEIGHT_ANCHOR: f64 = 3.0;
/// Afternoon sampling height is `(21 - t) / 3` collector heights.
pub const AFTERNOON_HEIGHT_ANCHOR: f64 = 21.0;
pub const HEIGHT_DIVISOR: f64 = 3.0;
/// Sampling bounds reach this far past the outer ring radius.
pub const BOUNDS_SCALE: f64 = 1.5;

/// Height of the plane the sample rays are cast from.
///
/// Grows from the morning anchor toward noon and shrinks toward the afternoon
/// anchor, scaled by `collector_height`.
pub fn sampling_height(sun: &Sun, collector_height: f64) -> f64 {
    let t = sun.time();
    if t - NOON > 0.0 {
        (AFTERNOON_HEIGHT_ANCHOR - t) / HEIGHT_DIVISOR * collector_height
    } else {
        (t - MORNING_HEIGHT_ANCHOR) / HEIGHT_DIVISOR * collector_height
    }
}

/// Bounding box of the panel field used to place the sampling window.
///
/// The box spans the diagonal from angle 5pi/4 to pi/4 at `1.5 * r_max`, with the
/// lower y bound stretched by another factor of 1.5, and covers the heights from
/// the first to the last ring.
pub fn sampling_bounds(params: &LayoutParams) -> (Point, Point) {
    let r = BOUNDS_SCALE * params.r_max;
    let min = Point::new(
        r * (5.0 * PI / 4.0).cos(),
        r * (5.0 * PI / 4.0).sin() * BOUNDS_SCALE,
        params.base_z,
    );
    let max = Point::new(r * FRAC_PI_4.cos(), r * FRAC_PI_4.sin(), params.top_z());
    (min, max)
}

/// Rectangular grid of ray origins on a horizontal plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingWindow {
    pub height: f64,
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub step_x: f64,
    pub step_y: f64,
}

impl SamplingWindow {
    /// Projects `min`/`max` toward the sun onto the plane `z = height` and pads
    /// the result by `margin` on all sides.
    ///
    /// Grid steps are `|max - min| / n` along x and y of the unprojected box.
    pub fn new(
        n: usize,
        min: Point,
        max: Point,
        sun: &Sun,
        height: f64,
        margin: f64,
    ) -> Result<Self, FieldError> {
        let to_sun = sun
            .direction()
            .normalize()
            .ok_or(FieldError::DegenerateGeometry("sun direction has zero length"))?;
        let plane = Plane::new(0.0, 0.0, 1.0, height);
        let lo = intersect(&Line::new(min, to_sun), &plane)?;
        let hi = intersect(&Line::new(max, to_sun), &plane)?;

        let n = n as f64;
        let step_x = (max.x - min.x).abs() / n;
        let step_y = (max.y - min.y).abs() / n;
        for step in [step_x, step_y] {
            if !step.is_finite() || step <= 0.0 {
                return Err(FieldError::InvalidConfig(format!(
                    "sampling step must be positive, got {step}"
                )));
            }
        }

        Ok(Self {
            height,
            min_x: lo.x - margin,
            max_x: hi.x + margin,
            min_y: lo.y - margin,
            max_y: hi.y + margin,
            step_x,
            step_y,
        })
    }

    /// Number of samples along x and y, both ends included.
    pub fn dims(&self) -> (usize, usize) {
        (
            samples(self.min_x, self.max_x, self.step_x),
            samples(self.min_y, self.max_y, self.step_y),
        )
    }

    /// Ray origins, x-major.
    pub fn origins(&self) -> impl Iterator<Item = Point> + '_ {
        let (nx, ny) = self.dims();
        (0..nx).flat_map(move |i| {
            (0..ny).map(move |j| {
                Point::new(
                    self.min_x + i as f64 * self.step_x,
                    self.min_y + j as f64 * self.step_y,
                    self.height,
                )
            })
        })
    }
}

fn samples(lo: f64, hi: f64, step: f64) -> usize {
    if hi < lo {
        return 0;
    }
    ((hi - lo) / step + 1e-9).floor() as usize + 1
}

/// Ray counts of one generation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RayCounts {
    pub miss_panel: usize,
    pub hit_panel: usize,
    pub miss_collector: usize,
    pub hit_collector: usize,
}

impl RayCounts {
    /// Number of sample rays cast.
    pub fn total(&self) -> usize {
        self.miss_panel + self.hit_panel
    }
}

/// The four ray populations produced by [`generate_rays`].
///
/// `hit_panel` keeps each accepted ray as it arrived at its panel; the same ray
/// after reflection is stored in `hit_collector` or `miss_collector`. A ray that
/// cannot be reflected stays in `PanelHit` and counts as a collector miss.
#[derive(Debug, Clone, Default)]
pub struct RayPopulations {
    miss_panel: Vec<Ray>,
    hit_panel: Vec<Ray>,
    miss_collector: Vec<Ray>,
    hit_collector: Vec<Ray>,
}

impl RayPopulations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn miss_panel(&self) -> &[Ray] {
        &self.miss_panel
    }

    pub fn hit_panel(&self) -> &[Ray] {
        &self.hit_panel
    }

    pub fn miss_collector(&self) -> &[Ray] {
        &self.miss_collector
    }

    pub fn hit_collector(&self) -> &[Ray] {
        &self.hit_collector
    }

    pub fn counts(&self) -> RayCounts {
        RayCounts {
            miss_panel: self.miss_panel.len(),
            hit_panel: self.hit_panel.len(),
            miss_collector: self.miss_collector.len(),
            hit_collector: self.hit_collector.len(),
        }
    }

    /// `hit_collector / hit_panel`, or None when no ray reached a panel.
    pub fn capture_ratio(&self) -> Option<f64> {
        if self.hit_panel.is_empty() {
            None
        } else {
            Some(self.hit_collector.len() as f64 / self.hit_panel.len() as f64)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.miss_panel.is_empty() && self.hit_panel.is_empty()
    }

    pub fn clear(&mut self) {
        self.miss_panel.clear();
        self.hit_panel.clear();
        self.miss_collector.clear();
        self.hit_collector.clear();
    }

    /// Runs one cast ray through the panels and, if accepted, on to the collector.
    fn classify(&mut self, mut ray: Ray, panels: &[Panel], collector: &Collector) {
        let Some(panel) = panels.iter().find(|p| ray.hits_panel(p)) else {
            self.miss_panel.push(ray);
            return;
        };
        self.hit_panel.push(ray.clone());
        // Every panel hit ends up in exactly one collector population
        if !ray.reflect(panel) {
            self.miss_collector.push(ray);
            return;
        }
        if ray.hits_collector(collector) {
            self.hit_collector.push(ray);
        } else {
            self.miss_collector.push(ray);
        }
    }
}

/// Casts an `n`-step grid of sunlight rays over the field and classifies them.
///
/// `min`/`max` bound the panel field, `collector_height` scales the sampling
/// height (see [`sampling_height`]). The sampling margin is taken from the
/// first panel's side length.
pub fn generate_rays(
    n: usize,
    min: Point,
    max: Point,
    sun: &Sun,
    collector: &Collector,
    panels: &[Panel],
    collector_height: f64,
) -> Result<RayPopulations, FieldError> {
    let first = panels.first().ok_or(FieldError::EmptyPanelSet)?;
    if n == 0 {
        return Err(FieldError::InvalidConfig(
            "resolution must be at least 1".to_string(),
        ));
    }

    let height = sampling_height(sun, collector_height);
    let margin = SAMPLING_MARGIN_PANELS * first.length();
    let window = SamplingWindow::new(n, min, max, sun, height, margin)?;
    let (nx, ny) = window.dims();
    debug!(
        "Sampling plane z = {:.3}, window x [{:.3}, {:.3}] y [{:.3}, {:.3}], {}x{} rays",
        height, window.min_x, window.max_x, window.min_y, window.max_y, nx, ny
    );

    let light = sun.light_direction();
    let mut populations = RayPopulations::new();
    for origin in window.origins() {
        populations.classify(Ray::cast(origin, light), panels, collector);
    }

    let counts = populations.counts();
    info!(
        "Cast {} rays: {} hit a panel, {} hit the collector, {} miss the collector",
        counts.total(),
        counts.hit_panel,
        counts.hit_collector,
        counts.miss_collector
    );
    Ok(populations)
}
