// src/pid/rate.rs

//! # Rate-Based PID Control Module
//!
//! This module provides the compute callback and control data structure
//! used by each axis of the rate control law.
//!
//! The callback returns `(error, integral, derivative)` for the
//! `PidController` to weight with `kp`, `ki` and `kd`. Two things differ from
//! a textbook PID:
//!
//! - The derivative is the negated measured angular acceleration rather than
//!   the difference of successive rate errors, so setpoint steps do not kick
//!   the output.
//! - The integral is stored as an output contribution (already multiplied by
//!   the integral gain), so the controller's `ki` is kept at one and the limit
//!   bounds what the integrator adds to the output.

use crate::Number;
use piddiy::PidController;

/// Control data for the rate law compute callback.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RateLawData<T> {
    /// The measured body rate on this axis.
    pub rate: T,
    /// The measured angular acceleration on this axis.
    pub angular_accel: T,
    /// The time delta since the last computation.
    pub dt: T,
    /// Integral gain applied to the accumulated error.
    pub ki: T,
    /// The maximum allowed magnitude of the integrator contribution.
    pub integral_limit: T,
    /// Whether the integrator may accumulate this step.
    pub integrate: bool,
    /// Clear the integrator.
    pub reset_integral: bool,
    /// The axis cannot deliver more positive torque.
    pub saturated_positive: bool,
    /// The axis cannot deliver more negative torque.
    pub saturated_negative: bool,
}

/// Rate law compute callback.
pub fn compute_rate_law<T: Number>(
    pid: &mut PidController<T, RateLawData<T>>,
    data: RateLawData<T>,
) -> (T, T, T) {
    let error = pid.set_point - data.rate;
    let integral = if data.reset_integral {
        T::zero()
    } else if data.integrate {
        let mut increment = data.ki * error * data.dt;
        // Anti-windup: never integrate further into a saturated direction.
        if (data.saturated_positive && increment > T::zero())
            || (data.saturated_negative && increment < T::zero())
        {
            increment = T::zero();
        }
        let integral = pid.integral + increment;
        if integral.is_finite() {
            integral.constrain(-data.integral_limit, data.integral_limit)
        } else {
            pid.integral
        }
    } else {
        pid.integral
            .constrain(-data.integral_limit, data.integral_limit)
    };
    let derivative = -data.angular_accel;

    (error, integral, derivative)
}

/// Builds a rate axis controller with the given gains.
pub fn rate_axis_pid<T: Number>(p: T, d: T) -> PidController<T, RateLawData<T>> {
    let mut pid = PidController::new();
    pid.compute_fn(compute_rate_law)
        .set_point(T::zero())
        .kp(p)
        .ki(T::one())
        .kd(d);
    pid
}
