// src/energy.rs

//! # Actuator Power Estimation
//!
//! Integrates actuator activity over a window of accumulated `dt` and
//! reports the mean power per channel. Control surfaces (roll, pitch, yaw)
//! only consume power while moving, so their activity is the change since
//! the previous command; other channels use the command itself.

/// Accumulated integration time after which a power estimate is published, in seconds.
pub const ENERGY_WINDOW: f32 = 0.5;

/// Number of tracked channels: roll, pitch, yaw, throttle.
pub const POWER_CHANNELS: usize = 4;

/// Channels below this index are moving control surfaces.
const SURFACE_CHANNELS: usize = 3;

/// Windowed per-channel energy integrator.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActuatorEnergyAccumulator {
    control_prev: [f32; POWER_CHANNELS],
    energy: [f32; POWER_CHANNELS],
    integration_time: f32,
}

impl ActuatorEnergyAccumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated integration time in the current window.
    pub fn integration_time(&self) -> f32 {
        self.integration_time
    }

    /// Adds one cycle of activity. Returns the per-channel power once the
    /// window has elapsed, then starts a new window.
    pub fn update(&mut self, controls: [f32; POWER_CHANNELS], dt: f32) -> Option<[f32; POWER_CHANNELS]> {
        for (i, &control) in controls.iter().enumerate() {
            let signal = if i < SURFACE_CHANNELS {
                let delta = control - self.control_prev[i];
                self.control_prev[i] = control;
                delta
            } else {
                control
            };
            self.energy[i] += signal * signal * dt;
        }

        self.integration_time += dt;

        if self.integration_time > ENERGY_WINDOW {
            let mut power = [0.0; POWER_CHANNELS];
            for (power, energy) in power.iter_mut().zip(self.energy.iter_mut()) {
                *power = *energy / self.integration_time;
                *energy = 0.0;
            }
            self.integration_time = 0.0;
            Some(power)
        } else {
            None
        }
    }
}
