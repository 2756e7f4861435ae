use crate::Vector;
use std::f64::consts::FRAC_PI_2;

/// Local sunrise in fractional hours.
pub const SUNRISE: f64 = 6.617;
/// Local solar noon in fractional hours.
pub const NOON: f64 = 12.45;
/// Local sunset in fractional hours.
pub const SUNSET: f64 = 18.667;
/// Scale applied to the vertical component of the sun direction.
pub const VERTICAL_SCALE: f64 = 1.6;

/// Sun at a given time of day.
///
/// The direction follows an empirical path rather than an ephemeris: with
/// `theta` sweeping 0..pi/2 between sunrise and noon and pi/2..pi between noon
/// and sunset, the direction toward the sun is
/// `(cos(theta), -sin(theta), 1.6 * sin(theta))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sun {
    time: f64,
    direction: Vector,
}

impl Sun {
    /// Creates the sun for `time` given in fractional hours (e.g. 13.5 = 13:30).
    pub fn new(time: f64) -> Self {
        Self {
            time,
            direction: direction_at(time),
        }
    }

    /// Moves the sun to another time of day.
    pub fn set_time(&mut self, time: f64) {
        self.time = time;
        self.direction = direction_at(time);
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Direction from the scene toward the sun (not normalized).
    pub fn direction(&self) -> Vector {
        self.direction
    }

    /// Direction in which sunlight travels (from the sun into the scene).
    pub fn light_direction(&self) -> Vector {
        -self.direction
    }

    /// Angle between the sun direction and the vertical, in degrees.
    pub fn normal_angle(&self) -> f64 {
        self.direction.angle(Vector::up()).to_degrees()
    }

    /// `normal_angle() + 90`, in degrees.
    pub fn horizon_angle(&self) -> f64 {
        self.normal_angle() + 90.0
    }

    /// Samples of the sun path between sunrise and sunset every `step` hours.
    ///
    /// The iterator is `Clone`, so a path can be replayed from the start.
    pub fn path(step: f64) -> SunPath {
        SunPath { step, index: 0 }
    }
}

/// Angle parameter of the empirical sun path, in radians.
fn path_angle(time: f64) -> f64 {
    if time < NOON {
        (time - SUNRISE) / (NOON - SUNRISE) * FRAC_PI_2
    } else if time > NOON {
        (time - NOON) / (SUNSET - NOON) * FRAC_PI_2 + FRAC_PI_2
    } else {
        FRAC_PI_2
    }
}

fn direction_at(time: f64) -> Vector {
    let theta = path_angle(time);
    Vector::new(theta.cos(), -theta.sin(), VERTICAL_SCALE * theta.sin())
}

/// Iterator over sun positions from sunrise while `t < SUNSET - step`.
#[derive(Debug, Clone)]
pub struct SunPath {
    step: f64,
    index: usize,
}

impl Iterator for SunPath {
    type Item = Sun;

    fn next(&mut self) -> Option<Sun> {
        if self.step <= 0.0 {
            return None;
        }
        let t = SUNRISE + self.index as f64 * self.step;
        if t >= SUNSET - self.step {
            return None;
        }
        self.index += 1;
        Some(Sun::new(t))
    }
}
