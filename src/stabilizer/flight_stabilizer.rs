// src/stabilizer/flight_stabilizer.rs

//! A module specifying the shared interface for the rate control law.
//! It includes the numeric trait the law is generic over, a configuration
//! structure for the per-axis gains, and a trait defining the stabilization
//! step.

use num_traits::Float;
use piddiy::Number as PiddiyNumber;

/// Custom trait to encapsulate base number requirements.
pub trait Number: PiddiyNumber + Float {
    /// Constrains a value to the closed range `[min, max]`.
    ///
    /// Never panics: when `min > max` the lower bound wins.
    fn constrain(self, min: Self, max: Self) -> Self {
        if self < min {
            min
        } else if max < self {
            max
        } else {
            self
        }
    }
}

impl<T: PiddiyNumber + Float> Number for T {}

/// Gains for a single rate axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisGains<T: Number> {
    /// Proportional gain on the rate error.
    pub p: T,
    /// Integral gain on the rate error.
    pub i: T,
    /// Derivative gain on the measured angular acceleration.
    pub d: T,
    /// Magnitude limit for the integrator contribution.
    pub integrator_limit: T,
}

impl<T: Number> AxisGains<T> {
    /// Proportional-only gains with a unit integrator limit.
    pub fn new() -> Self {
        Self {
            p: T::one(),
            i: T::zero(),
            d: T::zero(),
            integrator_limit: T::one(),
        }
    }
}

impl<T: Number> Default for AxisGains<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for the three-axis rate control law.
///
/// Feed-forward is not part of the law. The actuator blender adds it with
/// linear airspeed scaling, while the law output is scaled quadratically.
///
/// Example Usage
/// ```
/// use fixed_wing_rate_control::stabilizer::flight_stabilizer::RateLawConfig;
///
/// let mut config = RateLawConfig::<f32>::new();
///
/// config.roll.p = 0.05;
/// config.roll.i = 0.1;
/// config.roll.integrator_limit = 0.2;
///
/// config.pitch.p = 0.08;
/// config.pitch.i = 0.1;
/// config.pitch.integrator_limit = 0.4;
///
/// use fixed_wing_rate_control::stabilizer::rate::RateControlLaw;
///
/// let law = RateControlLaw::with_config(config);
/// assert_eq!(law.integrals(), (0.0, 0.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLawConfig<T: Number> {
    /// Roll rate gains.
    pub roll: AxisGains<T>,
    /// Pitch rate gains.
    pub pitch: AxisGains<T>,
    /// Yaw rate gains.
    pub yaw: AxisGains<T>,
}

impl<T: Number> RateLawConfig<T> {
    /// Creates a new configuration with proportional-only unit gains on
    /// every axis. These should be replaced with values tuned for the
    /// airframe.
    pub fn new() -> Self {
        Self {
            roll: AxisGains::new(),
            pitch: AxisGains::new(),
            yaw: AxisGains::new(),
        }
    }
}

impl<T: Number> Default for RateLawConfig<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-axis saturation reported by the downstream actuator allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SaturationStatus {
    /// Axes (roll, pitch, yaw) that cannot deliver more positive torque.
    pub positive: [bool; 3],
    /// Axes (roll, pitch, yaw) that cannot deliver more negative torque.
    pub negative: [bool; 3],
}

/// Inputs to one step of the rate control law.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLawInput<T> {
    /// Measured body rates (roll, pitch, yaw) in rad/s.
    pub rates: (T, T, T),
    /// Commanded body rates (roll, pitch, yaw) in rad/s.
    pub set_point: (T, T, T),
    /// Measured angular acceleration (roll, pitch, yaw) in rad/s^2.
    pub angular_accel: (T, T, T),
    /// Time delta since the last step, in seconds.
    pub dt: T,
    /// Vehicle is on the ground. Integration is suspended.
    pub landed: bool,
    /// Clear the integrators and skip integration for this step.
    pub reset_integral: bool,
}

/// A trait for rate stabilizers producing angular acceleration setpoints
/// from body rate errors.
pub trait FlightStabilizer<T: Number> {
    /// Runs one control step and returns the (roll, pitch, yaw) outputs.
    fn control(&mut self, input: RateLawInput<T>) -> (T, T, T);

    /// Clears the integrator state on every axis.
    fn reset_integral(&mut self);
}
