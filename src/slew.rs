// src/slew.rs

//! # Slew Rate Limiter
//!
//! Moves a stored value toward a target no faster than a configured rate.
//! Used for slow auxiliary surfaces (flaps, spoilers) so a step in the
//! requested setting becomes a ramp over the surface travel time.
//!
//! ```
//! use fixed_wing_rate_control::slew::SlewRateLimiter;
//!
//! // Full travel from 0 to 1 in one second.
//! let mut flaps = SlewRateLimiter::new(1.0_f32);
//! assert_eq!(flaps.update(1.0, 0.25), 0.25);
//! assert_eq!(flaps.update(1.0, 0.25), 0.5);
//!
//! flaps.set_forced_value(0.0);
//! assert_eq!(flaps.state(), 0.0);
//! ```

use crate::Number;

/// Scalar rate limiter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlewRateLimiter<T: Number> {
    slew_rate: T,
    state: T,
}

impl<T: Number> SlewRateLimiter<T> {
    /// Creates a limiter at zero with the given maximum rate of change per second.
    pub fn new(slew_rate: T) -> Self {
        Self {
            slew_rate,
            state: T::zero(),
        }
    }

    /// Changes the maximum rate of change per second.
    pub fn set_slew_rate(&mut self, slew_rate: T) {
        self.slew_rate = slew_rate;
    }

    /// Jumps to `value` without rate limiting.
    pub fn set_forced_value(&mut self, value: T) {
        self.state = value;
    }

    /// Current value.
    pub fn state(&self) -> T {
        self.state
    }

    /// Moves toward `target` by at most `slew_rate * dt` and returns the new value.
    pub fn update(&mut self, target: T, dt: T) -> T {
        let max_step = self.slew_rate * dt;
        let step = (target - self.state).constrain(-max_step, max_step);
        self.state = self.state + step;
        self.state
    }
}
