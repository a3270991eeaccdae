// src/trim.rs

//! # Trim Scheduling
//!
//! Baseline trims plus an airspeed dependent correction interpolated over
//! two segments: from the min-speed delta at minimum airspeed down to zero
//! at trim airspeed, then from zero up to the max-speed delta at maximum
//! airspeed. Deployed flaps add roll and pitch trim, spoilers add pitch trim.

use crate::config::{AirspeedConfig, TrimConfig};

/// Trim offsets in normalized actuator units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Trim {
    /// Roll trim.
    pub roll: f32,
    /// Pitch trim.
    pub pitch: f32,
    /// Yaw trim.
    pub yaw: f32,
}

/// Computes per-axis trim for the current flight condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimScheduler {
    trim: TrimConfig,
    airspeed: AirspeedConfig,
}

impl TrimScheduler {
    /// Creates a scheduler from the trim table and the airspeed breakpoints.
    pub fn new(trim: TrimConfig, airspeed: AirspeedConfig) -> Self {
        Self { trim, airspeed }
    }

    /// Replaces the trim table and breakpoints.
    pub fn set_config(&mut self, trim: TrimConfig, airspeed: AirspeedConfig) {
        self.trim = trim;
        self.airspeed = airspeed;
    }

    /// Trim at `airspeed` with the given flap and spoiler deflections.
    pub fn compute(&self, airspeed: f32, flaps: f32, spoilers: f32) -> Trim {
        let t = &self.trim;
        let a = &self.airspeed;

        let mut trim = Trim {
            roll: t.roll,
            pitch: t.pitch,
            yaw: t.yaw,
        };

        if airspeed < a.trim {
            trim.roll += interpolate(airspeed, a.min, a.trim, t.roll_vmin, 0.0);
            trim.pitch += interpolate(airspeed, a.min, a.trim, t.pitch_vmin, 0.0);
            trim.yaw += interpolate(airspeed, a.min, a.trim, t.yaw_vmin, 0.0);
        } else {
            trim.roll += interpolate(airspeed, a.trim, a.max, 0.0, t.roll_vmax);
            trim.pitch += interpolate(airspeed, a.trim, a.max, 0.0, t.pitch_vmax);
            trim.yaw += interpolate(airspeed, a.trim, a.max, 0.0, t.yaw_vmax);
        }

        trim.roll += flaps * t.roll_flaps;
        trim.pitch += flaps * t.pitch_flaps;
        trim.pitch += spoilers * t.pitch_spoilers;

        trim
    }
}

/// Linear interpolation between `(x_low, y_low)` and `(x_high, y_high)`,
/// holding the end values outside the range.
pub fn interpolate(value: f32, x_low: f32, x_high: f32, y_low: f32, y_high: f32) -> f32 {
    if value <= x_low {
        y_low
    } else if value >= x_high {
        y_high
    } else {
        let a = (y_high - y_low) / (x_high - x_low);
        let b = y_low - a * x_low;
        a * value + b
    }
}
