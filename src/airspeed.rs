// src/airspeed.rs

//! # Airspeed Scaling
//!
//! Control surface effectiveness grows with dynamic pressure. The scaler
//! turns the validated airspeed into a factor `trim_airspeed / airspeed`
//! that the blender applies squared to the rate law output and linearly to
//! the feed-forward term.
//!
//! Without a usable measurement the trim airspeed is assumed. A VTOL
//! hovering as a multicopter assumes stall airspeed instead, since that is
//! the strongest deflection that is still reasonable in flight.

use crate::config::AirspeedConfig;
use crate::messages::{AirspeedSample, VehicleStatus};
use crate::Number;

/// Measurements older than this are ignored.
pub const AIRSPEED_TIMEOUT_US: u64 = 1_000_000;

/// Smallest measured airspeed accepted, in m/s.
const MIN_MEASURED_AIRSPEED: f32 = 0.5;

/// Result of one scaling computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirspeedScaling {
    /// Airspeed used for trim scheduling, in m/s.
    pub airspeed: f32,
    /// Airspeed bounded to the flight envelope, in m/s.
    pub airspeed_constrained: f32,
    /// Effectiveness scale factor.
    pub scale: f32,
}

/// Derives the airspeed scale factor from telemetry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirspeedScaler {
    config: AirspeedConfig,
}

impl AirspeedScaler {
    /// Creates a scaler for the given airspeed envelope.
    pub fn new(config: AirspeedConfig) -> Self {
        Self { config }
    }

    /// Replaces the airspeed envelope.
    pub fn set_config(&mut self, config: AirspeedConfig) {
        self.config = config;
    }

    /// Computes airspeed and scale from the latest sample, if any, at time `now_us`.
    pub fn compute(
        &self,
        sample: Option<&AirspeedSample>,
        now_us: u64,
        status: &VehicleStatus,
    ) -> AirspeedScaling {
        let config = &self.config;
        let measured = sample
            .filter(|s| {
                s.calibrated_airspeed_m_s.is_finite()
                    && now_us.saturating_sub(s.timestamp) < AIRSPEED_TIMEOUT_US
            })
            .map(|s| s.calibrated_airspeed_m_s);

        let airspeed = match measured {
            Some(measured) if config.use_airspeed => measured.max(MIN_MEASURED_AIRSPEED),
            _ if status.is_vtol_hover() => config.stall,
            _ => config.trim,
        };

        let airspeed_constrained = airspeed
            .constrain(config.stall, config.max)
            .constrain(0.1, 1000.0);

        let scale = if config.scaling_enabled {
            config.trim / airspeed_constrained
        } else {
            1.0
        };

        AirspeedScaling {
            airspeed,
            airspeed_constrained,
            scale,
        }
    }
}
