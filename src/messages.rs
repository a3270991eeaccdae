// src/messages.rs

//! # Telemetry Messages
//!
//! Samples exchanged with the rest of the flight stack. Timestamps are
//! microseconds on the host clock returned by
//! [`CycleScheduler::now_us`](crate::controller::CycleScheduler::now_us).

use serde::{Deserialize, Serialize};

/// Body angular velocity and acceleration. A new sample triggers a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RateSample {
    /// Time the underlying gyro sample was taken.
    pub timestamp_sample: u64,
    /// Roll, pitch, yaw rate in rad/s.
    pub xyz: [f32; 3],
    /// Roll, pitch, yaw angular acceleration in rad/s^2.
    pub xyz_derivative: [f32; 3],
}

/// Commanded body rates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RateSetpoint {
    /// Time the setpoint was generated.
    pub timestamp: u64,
    /// Roll rate in rad/s.
    pub roll: f32,
    /// Pitch rate in rad/s.
    pub pitch: f32,
    /// Yaw rate in rad/s.
    pub yaw: f32,
    /// Body thrust, only the forward component is used.
    pub thrust_body: [f32; 3],
    /// Clear the rate integrators.
    pub reset_integral: bool,
}

/// Flap setting requested by the upstream controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlapsMode {
    /// Retracted.
    #[default]
    Off,
    /// Landing setting.
    Land,
    /// Takeoff setting.
    Takeoff,
}

/// Spoiler setting requested by the upstream controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpoilersMode {
    /// Retracted.
    #[default]
    Off,
    /// Landing setting.
    Land,
    /// Descent setting.
    Descend,
}

/// Attitude setpoint fields consumed here: only the surface selectors.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AttitudeSetpoint {
    /// Requested flap setting.
    pub apply_flaps: FlapsMode,
    /// Requested spoiler setting.
    pub apply_spoilers: SpoilersMode,
}

/// Airframe class currently flying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    /// Not reported yet.
    #[default]
    Unknown,
    /// Multicopter, including a VTOL in hover.
    RotaryWing,
    /// Fixed-wing, including a VTOL in forward flight.
    FixedWing,
    /// Ground vehicle.
    Rover,
}

/// Vehicle configuration and VTOL phase.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VehicleStatus {
    /// Airframe class currently flying.
    pub vehicle_type: VehicleType,
    /// Vehicle is a VTOL.
    pub is_vtol: bool,
    /// Vehicle is a tailsitter VTOL.
    pub is_vtol_tailsitter: bool,
    /// A VTOL transition is in progress.
    pub in_transition_mode: bool,
}

impl VehicleStatus {
    /// Fixed-wing flight, or a transition on a VTOL that is not a tailsitter.
    pub fn in_fw_or_transition_wo_tailsitter(&self) -> bool {
        let is_in_transition_except_tailsitter =
            self.in_transition_mode && !self.is_vtol_tailsitter;
        self.vehicle_type == VehicleType::FixedWing || is_in_transition_except_tailsitter
    }

    /// VTOL hovering as a multicopter.
    pub fn is_vtol_hover(&self) -> bool {
        self.is_vtol && self.vehicle_type == VehicleType::RotaryWing && !self.in_transition_mode
    }

    /// Pure multicopter; fixed-wing control has nothing to do.
    pub fn is_pure_rotary_wing(&self) -> bool {
        self.vehicle_type == VehicleType::RotaryWing && !self.is_vtol
    }
}

/// Enabled control loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlMode {
    /// Pilot sticks are in the loop.
    pub manual_enabled: bool,
    /// An autonomous mode is active.
    pub auto_enabled: bool,
    /// Rate control is enabled.
    pub rates_enabled: bool,
    /// Attitude control is enabled.
    pub attitude_enabled: bool,
    /// Climb rate control is enabled.
    pub climb_rate_enabled: bool,
}

/// Pilot stick and switch positions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ManualControl {
    /// Roll stick in [-1, 1].
    pub roll: f32,
    /// Pitch stick in [-1, 1], positive nose up.
    pub pitch: f32,
    /// Yaw stick in [-1, 1].
    pub yaw: f32,
    /// Throttle stick in [-1, 1].
    pub throttle: f32,
    /// Flaps channel in [0, 1], NaN when unassigned.
    pub flaps: f32,
    /// First auxiliary channel, NaN when unassigned.
    pub aux1: f32,
    /// Third auxiliary channel, drives the landing gear.
    pub aux3: f32,
}

/// Land detector output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LandDetected {
    /// Vehicle is on the ground.
    pub landed: bool,
}

/// Validated airspeed estimate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AirspeedSample {
    /// Time of the measurement.
    pub timestamp: u64,
    /// Calibrated airspeed in m/s, NaN when invalid.
    pub calibrated_airspeed_m_s: f32,
}

/// Feedback from the control allocation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AllocatorStatus {
    /// The whole torque setpoint was allocated.
    pub torque_setpoint_achieved: bool,
    /// Torque (roll, pitch, yaw) that could not be allocated.
    pub unallocated_torque: [f32; 3],
}

/// Battery state used for throttle compensation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BatteryStatus {
    /// A battery is connected.
    pub connected: bool,
    /// Throttle scale compensating voltage sag, >= 1.
    pub scale: f32,
}

/// Normalized actuator command.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ActuatorCommand {
    /// Time the command was computed.
    pub timestamp: u64,
    /// Timestamp of the rate sample the command was computed from.
    pub timestamp_sample: u64,
    /// Aileron command in [-1, 1].
    pub roll: f32,
    /// Elevator command in [-1, 1].
    pub pitch: f32,
    /// Rudder command in [-1, 1].
    pub yaw: f32,
    /// Throttle command in [0, 1].
    pub throttle: f32,
    /// Flap deflection in [0, 1].
    pub flaps: f32,
    /// Spoiler deflection in [0, 1].
    pub spoilers: f32,
    /// Airbrake deflection in [0, 1].
    pub airbrakes: f32,
    /// Landing gear command.
    pub landing_gear: f32,
}

impl ActuatorCommand {
    /// Channels tracked for power estimation: roll, pitch, yaw, throttle.
    pub fn power_channels(&self) -> [f32; 4] {
        [self.roll, self.pitch, self.yaw, self.throttle]
    }
}

/// Body torque setpoint, normalized.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TorqueSetpoint {
    /// Time the setpoint was computed.
    pub timestamp: u64,
    /// Timestamp of the triggering rate sample.
    pub timestamp_sample: u64,
    /// Roll, pitch, yaw torque.
    pub xyz: [f32; 3],
}

/// Body thrust setpoint, normalized.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ThrustSetpoint {
    /// Time the setpoint was computed.
    pub timestamp: u64,
    /// Timestamp of the triggering rate sample.
    pub timestamp_sample: u64,
    /// Forward, right, down thrust.
    pub xyz: [f32; 3],
}

/// Snapshot of the rate law.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RateControlStatus {
    /// Time of the snapshot.
    pub timestamp: u64,
    /// Roll integrator contribution.
    pub rollspeed_integ: f32,
    /// Pitch integrator contribution.
    pub pitchspeed_integ: f32,
    /// Yaw integrator contribution.
    pub yawspeed_integ: f32,
    /// Axes (roll, pitch, yaw) saturated in the positive direction.
    pub saturation_positive: [bool; 3],
    /// Axes (roll, pitch, yaw) saturated in the negative direction.
    pub saturation_negative: [bool; 3],
    /// Proportional gains (roll, pitch, yaw).
    pub gains_p: [f32; 3],
    /// Integral gains (roll, pitch, yaw).
    pub gains_i: [f32; 3],
    /// Derivative gains (roll, pitch, yaw).
    pub gains_d: [f32; 3],
}

/// Windowed actuator power estimate for roll, pitch, yaw and throttle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ActuatorPowerStatus {
    /// Time of the estimate.
    pub timestamp: u64,
    /// Mean power for roll, pitch, yaw and throttle.
    pub control_power: [f32; 4],
}
