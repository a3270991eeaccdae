// src/controller/manual.rs

//! Manual flight: acro rate setpoints and direct stick pass-through.

use crate::config::{ManualConfig, TrimConfig};
use crate::messages::{ControlMode, ManualControl, RateSetpoint};

/// Command derived from the pilot's sticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ManualCommand {
    /// Acro: sticks command body rates.
    Rates(RateSetpoint),
    /// Direct: sticks command the surfaces around trim.
    Direct {
        /// Aileron command.
        roll: f32,
        /// Elevator command.
        pitch: f32,
        /// Rudder command.
        yaw: f32,
        /// Throttle in [0, 1].
        throttle: f32,
    },
}

/// Maps the sticks to a command when manual fixed-wing flight applies.
///
/// Returns `None` unless manual control is enabled, climb rate control is
/// not, and the vehicle is flying fixed-wing or transitioning.
pub fn manual_command(
    mode: &ControlMode,
    manual: &ManualControl,
    in_fw_or_transition: bool,
    config: &ManualConfig,
    trim: &TrimConfig,
    now_us: u64,
) -> Option<ManualCommand> {
    if !(mode.manual_enabled && !mode.climb_rate_enabled && in_fw_or_transition) {
        return None;
    }

    let throttle = finite_or(manual.throttle, -1.0);
    let throttle = (throttle + 1.0) * 0.5;

    if mode.rates_enabled && !mode.attitude_enabled {
        Some(ManualCommand::Rates(RateSetpoint {
            timestamp: now_us,
            roll: finite_or(manual.roll, 0.0) * config.acro_roll_max_deg.to_radians(),
            pitch: -finite_or(manual.pitch, 0.0) * config.acro_pitch_max_deg.to_radians(),
            yaw: finite_or(manual.yaw, 0.0) * config.acro_yaw_max_deg.to_radians(),
            thrust_body: [throttle, 0.0, 0.0],
            reset_integral: false,
        }))
    } else {
        // An unassigned stick holds its surface at trim.
        let surface = |stick: f32, scale: f32, trim: f32| {
            if stick.is_finite() {
                stick * scale + trim
            } else {
                trim
            }
        };
        Some(ManualCommand::Direct {
            roll: surface(manual.roll, config.roll_scale, trim.roll),
            pitch: surface(-manual.pitch, config.pitch_scale, trim.pitch),
            yaw: surface(manual.yaw, config.yaw_scale, trim.yaw),
            throttle,
        })
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}
