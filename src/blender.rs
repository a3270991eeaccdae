// src/blender.rs

//! # Actuator Blending
//!
//! Combines the rate law output with feed-forward, airspeed scaling and trim
//! into normalized actuator commands.
//!
//! Per axis:
//!
//! ```text
//! feedforward = ff_gain * scale * rate_setpoint
//! u           = law_output * scale^2 + feedforward
//! command     = finite(u) ? clamp(u + trim, -1, 1) : trim
//! ```
//!
//! The law output scales with the square of the airspeed factor while the
//! feed-forward scales linearly: the feed-forward gain already contains one
//! factor of surface effectiveness.

use crate::messages::{ActuatorCommand, BatteryStatus};
use crate::trim::Trim;
use crate::Number;

/// Throttle below which battery compensation is not applied.
const BATTERY_SCALE_THROTTLE_MIN: f32 = 0.1;

/// Inputs for blending the three rotational axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBlendInput {
    /// Rate law output (roll, pitch, yaw).
    pub law_output: (f32, f32, f32),
    /// Rate setpoint (roll, pitch, yaw) in rad/s.
    pub rate_setpoint: (f32, f32, f32),
    /// Feed-forward gains (roll, pitch, yaw).
    pub feedforward_gain: (f32, f32, f32),
    /// Airspeed scale factor.
    pub scale: f32,
    /// Per-axis trim.
    pub trim: Trim,
}

/// Blended rotational commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisCommands {
    /// Roll command in [-1, 1].
    pub roll: f32,
    /// Pitch command in [-1, 1].
    pub pitch: f32,
    /// Yaw command in [-1, 1].
    pub yaw: f32,
    /// At least one axis was non-finite and fell back to trim. The rate law
    /// integrators must be reset.
    pub reset_integral: bool,
}

/// Builds the actuator command; owns the cached battery scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActuatorBlender {
    battery_scale: f32,
}

impl Default for ActuatorBlender {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorBlender {
    /// Creates a blender with unit battery scale.
    pub fn new() -> Self {
        Self { battery_scale: 1.0 }
    }

    /// Cached battery scale.
    pub fn battery_scale(&self) -> f32 {
        self.battery_scale
    }

    /// Caches the scale of a connected battery reporting a positive factor.
    pub fn update_battery(&mut self, battery: &BatteryStatus) {
        if battery.connected && battery.scale > 0.0 {
            self.battery_scale = battery.scale;
        }
    }

    /// Blends roll, pitch and yaw.
    pub fn blend_axes(&self, input: &AxisBlendInput) -> AxisCommands {
        let scale = input.scale;
        let blend = |law: f32, set_point: f32, ff_gain: f32, trim: f32| -> (f32, bool) {
            let feedforward = ff_gain * scale * set_point;
            let u = law * scale * scale + feedforward;
            if u.is_finite() {
                ((u + trim).constrain(-1.0, 1.0), true)
            } else {
                (trim, false)
            }
        };

        let (roll, roll_ok) = blend(
            input.law_output.0,
            input.rate_setpoint.0,
            input.feedforward_gain.0,
            input.trim.roll,
        );
        let (pitch, pitch_ok) = blend(
            input.law_output.1,
            input.rate_setpoint.1,
            input.feedforward_gain.1,
            input.trim.pitch,
        );
        let (yaw, yaw_ok) = blend(
            input.law_output.2,
            input.rate_setpoint.2,
            input.feedforward_gain.2,
            input.trim.yaw,
        );

        AxisCommands {
            roll,
            pitch,
            yaw,
            reset_integral: !(roll_ok && pitch_ok && yaw_ok),
        }
    }

    /// Throttle from the setpoint thrust, compensated for battery sag when enabled.
    pub fn throttle(&self, thrust: f32, battery_scaling_enabled: bool) -> f32 {
        let throttle = if thrust.is_finite() { thrust } else { 0.0 };
        if battery_scaling_enabled && throttle > BATTERY_SCALE_THROTTLE_MIN {
            throttle * self.battery_scale
        } else {
            throttle
        }
    }
}

/// Adds the roll-to-yaw cross feed that counters adverse yaw.
pub fn apply_roll_to_yaw(command: &mut ActuatorCommand, gain: f32) {
    command.yaw += gain * command.roll.constrain(-1.0, 1.0);
}
