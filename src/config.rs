// src/config.rs

//! # Controller Configuration
//!
//! The full parameter set of the rate controller. It is injected at
//! construction and replaced as a whole through
//! [`ControlCycle::update_parameters`](crate::controller::ControlCycle::update_parameters).
//!
//! Every section deserializes with defaults for missing fields, so a
//! partial document only overrides what it names.

use crate::error::{ControlError, ControlResult};
use crate::stabilizer::{AxisGains, RateLawConfig};
use serde::{Deserialize, Serialize};

/// Gains for one rate axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisRateGains {
    /// Proportional gain.
    pub p: f32,
    /// Integral gain.
    pub i: f32,
    /// Derivative gain on measured angular acceleration.
    pub d: f32,
    /// Integrator contribution limit.
    pub integrator_limit: f32,
    /// Feed-forward gain on the rate setpoint, applied outside the law.
    pub feedforward: f32,
}

impl Default for AxisRateGains {
    fn default() -> Self {
        Self {
            p: 0.05,
            i: 0.1,
            d: 0.0,
            integrator_limit: 0.2,
            feedforward: 0.5,
        }
    }
}

impl AxisRateGains {
    fn law_gains(&self) -> AxisGains<f32> {
        AxisGains {
            p: self.p,
            i: self.i,
            d: self.d,
            integrator_limit: self.integrator_limit,
        }
    }
}

/// Airspeed envelope and scaling switches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirspeedConfig {
    /// Stall airspeed in m/s.
    pub stall: f32,
    /// Minimum flying airspeed in m/s.
    pub min: f32,
    /// Trim (cruise) airspeed in m/s.
    pub trim: f32,
    /// Maximum airspeed in m/s.
    pub max: f32,
    /// Use the measured airspeed when valid. Otherwise trim airspeed is assumed.
    pub use_airspeed: bool,
    /// Scale control effort by `trim / airspeed`.
    pub scaling_enabled: bool,
}

impl Default for AirspeedConfig {
    fn default() -> Self {
        Self {
            stall: 7.0,
            min: 10.0,
            trim: 15.0,
            max: 20.0,
            use_airspeed: true,
            scaling_enabled: true,
        }
    }
}

/// Baseline trims and their airspeed and surface dependent deltas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimConfig {
    /// Baseline roll trim.
    pub roll: f32,
    /// Baseline pitch trim.
    pub pitch: f32,
    /// Baseline yaw trim.
    pub yaw: f32,
    /// Roll trim delta at minimum airspeed.
    pub roll_vmin: f32,
    /// Pitch trim delta at minimum airspeed.
    pub pitch_vmin: f32,
    /// Yaw trim delta at minimum airspeed.
    pub yaw_vmin: f32,
    /// Roll trim delta at maximum airspeed.
    pub roll_vmax: f32,
    /// Pitch trim delta at maximum airspeed.
    pub pitch_vmax: f32,
    /// Yaw trim delta at maximum airspeed.
    pub yaw_vmax: f32,
    /// Roll trim per unit of flap deflection.
    pub roll_flaps: f32,
    /// Pitch trim per unit of flap deflection.
    pub pitch_flaps: f32,
    /// Pitch trim per unit of spoiler deflection.
    pub pitch_spoilers: f32,
}

/// Flap targets and travel rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlapsConfig {
    /// Flap setting commanded for landing.
    pub landing_scale: f32,
    /// Flap setting commanded for takeoff.
    pub takeoff_scale: f32,
    /// Travel rate in units per second.
    pub slew_rate: f32,
}

impl Default for FlapsConfig {
    fn default() -> Self {
        Self {
            landing_scale: 1.0,
            takeoff_scale: 0.0,
            slew_rate: 1.0,
        }
    }
}

/// Manual input channel driving the spoilers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpoilerManualSource {
    /// Spoilers stay retracted in manual flight.
    #[default]
    Disabled,
    /// Spoilers follow the flaps channel.
    Flaps,
    /// Spoilers follow the first auxiliary channel.
    Aux1,
}

/// Spoiler targets and travel rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpoilersConfig {
    /// Manual channel the spoilers follow.
    pub manual_source: SpoilerManualSource,
    /// Spoiler setting commanded for landing.
    pub landing: f32,
    /// Spoiler setting commanded for descent.
    pub descend: f32,
    /// Travel rate in units per second.
    pub slew_rate: f32,
}

impl Default for SpoilersConfig {
    fn default() -> Self {
        Self {
            manual_source: SpoilerManualSource::Disabled,
            landing: 0.0,
            descend: 0.0,
            slew_rate: 1.0,
        }
    }
}

/// Stick scaling for direct manual and acro flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualConfig {
    /// Roll stick to aileron scale in direct manual.
    pub roll_scale: f32,
    /// Pitch stick to elevator scale in direct manual.
    pub pitch_scale: f32,
    /// Yaw stick to rudder scale in direct manual.
    pub yaw_scale: f32,
    /// Full-stick roll rate in acro mode, deg/s.
    pub acro_roll_max_deg: f32,
    /// Full-stick pitch rate in acro mode, deg/s.
    pub acro_pitch_max_deg: f32,
    /// Full-stick yaw rate in acro mode, deg/s.
    pub acro_yaw_max_deg: f32,
}

impl Default for ManualConfig {
    fn default() -> Self {
        Self {
            roll_scale: 1.0,
            pitch_scale: 1.0,
            yaw_scale: 1.0,
            acro_roll_max_deg: 90.0,
            acro_pitch_max_deg: 90.0,
            acro_yaw_max_deg: 45.0,
        }
    }
}

/// Complete rate controller parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Roll rate gains.
    pub roll: AxisRateGains,
    /// Pitch rate gains.
    pub pitch: AxisRateGains,
    /// Yaw rate gains.
    pub yaw: AxisRateGains,
    /// Yaw command added per unit of roll command to counter adverse yaw.
    pub roll_to_yaw_feedforward: f32,
    /// Airspeed envelope and scaling.
    pub airspeed: AirspeedConfig,
    /// Trim table.
    pub trim: TrimConfig,
    /// Flap settings.
    pub flaps: FlapsConfig,
    /// Spoiler settings.
    pub spoilers: SpoilersConfig,
    /// Manual stick scaling.
    pub manual: ManualConfig,
    /// Scale throttle by the battery voltage drop factor.
    pub battery_scaling_enabled: bool,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            roll: AxisRateGains::default(),
            pitch: AxisRateGains {
                p: 0.08,
                integrator_limit: 0.4,
                ..AxisRateGains::default()
            },
            yaw: AxisRateGains {
                feedforward: 0.3,
                ..AxisRateGains::default()
            },
            roll_to_yaw_feedforward: 0.0,
            airspeed: AirspeedConfig::default(),
            trim: TrimConfig::default(),
            flaps: FlapsConfig::default(),
            spoilers: SpoilersConfig::default(),
            manual: ManualConfig::default(),
            battery_scaling_enabled: false,
        }
    }
}

impl ControlConfig {
    /// Gains handed to the rate control law.
    pub fn rate_law_config(&self) -> RateLawConfig<f32> {
        RateLawConfig {
            roll: self.roll.law_gains(),
            pitch: self.pitch.law_gains(),
            yaw: self.yaw.law_gains(),
        }
    }

    /// Feed-forward gains (roll, pitch, yaw).
    pub fn feedforward(&self) -> (f32, f32, f32) {
        (self.roll.feedforward, self.pitch.feedforward, self.yaw.feedforward)
    }

    /// Checks the parameter set for values the controller cannot run with.
    pub fn validate(&self) -> ControlResult<()> {
        for gains in [&self.roll, &self.pitch, &self.yaw] {
            let values = [gains.p, gains.i, gains.d, gains.integrator_limit, gains.feedforward];
            if values.iter().any(|v| !v.is_finite()) {
                return Err(ControlError::InvalidConfig {
                    what: "rate gains must be finite",
                });
            }
            if gains.integrator_limit < 0.0 {
                return Err(ControlError::InvalidConfig {
                    what: "integrator limit must not be negative",
                });
            }
        }

        let airspeed = &self.airspeed;
        if [airspeed.stall, airspeed.min, airspeed.trim, airspeed.max]
            .iter()
            .any(|v| !v.is_finite())
        {
            return Err(ControlError::InvalidConfig {
                what: "airspeeds must be finite",
            });
        }
        if airspeed.stall <= 0.0 {
            return Err(ControlError::InvalidConfig {
                what: "stall airspeed must be positive",
            });
        }
        if airspeed.stall > airspeed.min {
            return Err(ControlError::InvalidConfig {
                what: "stall airspeed above min airspeed",
            });
        }
        if airspeed.min > airspeed.trim {
            return Err(ControlError::InvalidConfig {
                what: "min airspeed above trim airspeed",
            });
        }
        if airspeed.trim > airspeed.max {
            return Err(ControlError::InvalidConfig {
                what: "trim airspeed above max airspeed",
            });
        }

        if !(self.flaps.slew_rate > 0.0 && self.flaps.slew_rate.is_finite()) {
            return Err(ControlError::InvalidConfig {
                what: "flap slew rate must be positive",
            });
        }
        if !(self.spoilers.slew_rate > 0.0 && self.spoilers.slew_rate.is_finite()) {
            return Err(ControlError::InvalidConfig {
                what: "spoiler slew rate must be positive",
            });
        }

        Ok(())
    }
}
