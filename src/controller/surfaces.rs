// src/controller/surfaces.rs

//! Flap and spoiler targets and their rate limited positions.

use crate::config::{FlapsConfig, SpoilerManualSource, SpoilersConfig};
use crate::messages::{AttitudeSetpoint, ControlMode, FlapsMode, ManualControl, SpoilersMode};
use crate::slew::SlewRateLimiter;
use crate::Number;

/// Requested flap setting in [0, 1].
pub fn flaps_target(
    mode: &ControlMode,
    manual: Option<&ManualControl>,
    attitude_setpoint: &AttitudeSetpoint,
    config: &FlapsConfig,
) -> f32 {
    let manual_flaps = manual
        .map(|m| m.flaps)
        .filter(|flaps| flaps.is_finite() && mode.manual_enabled);

    let target = if let Some(flaps) = manual_flaps {
        flaps
    } else if mode.auto_enabled {
        match attitude_setpoint.apply_flaps {
            FlapsMode::Off => 0.0,
            FlapsMode::Land => config.landing_scale,
            FlapsMode::Takeoff => config.takeoff_scale,
        }
    } else {
        0.0
    };

    target.constrain(0.0, 1.0)
}

/// Requested spoiler setting in [0, 1].
pub fn spoilers_target(
    mode: &ControlMode,
    manual: Option<&ManualControl>,
    attitude_setpoint: &AttitudeSetpoint,
    config: &SpoilersConfig,
) -> f32 {
    let finite_or_zero = |value: f32| if value.is_finite() { value } else { 0.0 };

    let target = if mode.manual_enabled {
        match (config.manual_source, manual) {
            (SpoilerManualSource::Flaps, Some(manual)) => finite_or_zero(manual.flaps),
            (SpoilerManualSource::Aux1, Some(manual)) => finite_or_zero(manual.aux1),
            _ => 0.0,
        }
    } else if mode.auto_enabled {
        match attitude_setpoint.apply_spoilers {
            SpoilersMode::Off => 0.0,
            SpoilersMode::Land => config.landing,
            SpoilersMode::Descend => config.descend,
        }
    } else {
        0.0
    };

    target.constrain(0.0, 1.0)
}

/// Slew limited flap and spoiler positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuxiliarySurfaces {
    flaps: SlewRateLimiter<f32>,
    spoilers: SlewRateLimiter<f32>,
}

impl AuxiliarySurfaces {
    /// Creates retracted surfaces with the configured travel rates.
    pub fn new(flaps: &FlapsConfig, spoilers: &SpoilersConfig) -> Self {
        Self {
            flaps: SlewRateLimiter::new(flaps.slew_rate),
            spoilers: SlewRateLimiter::new(spoilers.slew_rate),
        }
    }

    /// Updates the travel rates.
    pub fn set_slew_rates(&mut self, flaps: &FlapsConfig, spoilers: &SpoilersConfig) {
        self.flaps.set_slew_rate(flaps.slew_rate);
        self.spoilers.set_slew_rate(spoilers.slew_rate);
    }

    /// Moves both surfaces toward their targets.
    pub fn update(&mut self, flaps_target: f32, spoilers_target: f32, dt: f32) {
        let _ = self.flaps.update(flaps_target, dt);
        let _ = self.spoilers.update(spoilers_target, dt);
    }

    /// Snaps both surfaces to retracted.
    pub fn force_retracted(&mut self) {
        self.flaps.set_forced_value(0.0);
        self.spoilers.set_forced_value(0.0);
    }

    /// Current flap position.
    pub fn flaps(&self) -> f32 {
        self.flaps.state()
    }

    /// Current spoiler position.
    pub fn spoilers(&self) -> f32 {
        self.spoilers.state()
    }
}
