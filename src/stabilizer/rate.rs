// src/stabilizer/rate.rs

//! # Rate PID-based Flight Stabilization Controller
//!
//! Three-axis rate control law with saturation-aware anti-windup. Each axis
//! is a `PidController` driven by [`crate::pid::compute_rate_law`]; the law owns the
//! integrator state and the latest saturation feedback from the actuator
//! allocation.
//!
//! Per axis the output is
//!
//! ```text
//! P * (setpoint - rate) + integrator - D * angular_accel
//! ```
//!
//! and the integrator grows by `I * error * dt` unless the vehicle is landed,
//! a reset is requested, or the axis is saturated in the direction of growth.
//! The integrator is bounded by its limit after every step.

use crate::pid::{rate_axis_pid, RateLawData};
use crate::{AxisGains, FlightStabilizer, Number, RateLawConfig, RateLawInput, SaturationStatus};
use piddiy::PidController;

/// Three-axis rate control law.
pub struct RateControlLaw<T: Number> {
    roll_pid: PidController<T, RateLawData<T>>,
    pitch_pid: PidController<T, RateLawData<T>>,
    yaw_pid: PidController<T, RateLawData<T>>,
    config: RateLawConfig<T>,
    saturation: SaturationStatus,
}

impl<T: Number> RateControlLaw<T> {
    /// Creates a new control law using the provided configuration.
    pub fn with_config(config: RateLawConfig<T>) -> Self {
        RateControlLaw {
            roll_pid: rate_axis_pid(config.roll.p, config.roll.d),
            pitch_pid: rate_axis_pid(config.pitch.p, config.pitch.d),
            yaw_pid: rate_axis_pid(config.yaw.p, config.yaw.d),
            config,
            saturation: SaturationStatus::default(),
        }
    }

    /// Creates a new control law with default settings.
    pub fn new() -> Self {
        Self::with_config(RateLawConfig::new())
    }

    /// Replaces the gains. Integrator state is kept but re-bounded by the
    /// new limits.
    pub fn set_gains(&mut self, config: RateLawConfig<T>) {
        apply_gains(&mut self.roll_pid, &config.roll);
        apply_gains(&mut self.pitch_pid, &config.pitch);
        apply_gains(&mut self.yaw_pid, &config.yaw);
        self.config = config;
    }

    /// Current gains.
    pub fn gains(&self) -> &RateLawConfig<T> {
        &self.config
    }

    /// Stores the latest saturation feedback. It gates integration until
    /// replaced.
    pub fn set_saturation_status(&mut self, saturation: SaturationStatus) {
        self.saturation = saturation;
    }

    /// Latest saturation feedback.
    pub fn saturation_status(&self) -> SaturationStatus {
        self.saturation
    }

    /// Integrator contributions (roll, pitch, yaw).
    pub fn integrals(&self) -> (T, T, T) {
        (
            self.roll_pid.integral,
            self.pitch_pid.integral,
            self.yaw_pid.integral,
        )
    }

    fn axis_data(
        &self,
        axis: usize,
        gains: &AxisGains<T>,
        rate: T,
        angular_accel: T,
        input: &RateLawInput<T>,
    ) -> RateLawData<T> {
        RateLawData {
            rate,
            angular_accel,
            dt: input.dt,
            ki: gains.i,
            integral_limit: gains.integrator_limit,
            integrate: !input.landed,
            reset_integral: input.reset_integral,
            saturated_positive: self.saturation.positive[axis],
            saturated_negative: self.saturation.negative[axis],
        }
    }
}

impl<T: Number> Default for RateControlLaw<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Number> FlightStabilizer<T> for RateControlLaw<T> {
    fn control(&mut self, input: RateLawInput<T>) -> (T, T, T) {
        let (set_point_roll, set_point_pitch, set_point_yaw) = input.set_point;
        self.roll_pid.set_point(set_point_roll);
        self.pitch_pid.set_point(set_point_pitch);
        self.yaw_pid.set_point(set_point_yaw);

        let (rate_roll, rate_pitch, rate_yaw) = input.rates;
        let (accel_roll, accel_pitch, accel_yaw) = input.angular_accel;
        let config = self.config;
        let roll_data = self.axis_data(0, &config.roll, rate_roll, accel_roll, &input);
        let pitch_data = self.axis_data(1, &config.pitch, rate_pitch, accel_pitch, &input);
        let yaw_data = self.axis_data(2, &config.yaw, rate_yaw, accel_yaw, &input);

        let roll_output = self.roll_pid.compute(roll_data);
        let pitch_output = self.pitch_pid.compute(pitch_data);
        let yaw_output = self.yaw_pid.compute(yaw_data);

        if !(roll_output.is_finite() && pitch_output.is_finite() && yaw_output.is_finite()) {
            self.reset_integral();
        }

        (roll_output, pitch_output, yaw_output)
    }

    fn reset_integral(&mut self) {
        self.roll_pid.integral = T::zero();
        self.pitch_pid.integral = T::zero();
        self.yaw_pid.integral = T::zero();
    }
}

fn apply_gains<T: Number>(pid: &mut PidController<T, RateLawData<T>>, gains: &AxisGains<T>) {
    pid.kp(gains.p).kd(gains.d);
    pid.integral = pid
        .integral
        .constrain(-gains.integrator_limit, gains.integrator_limit);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use proptest::prelude::*;

    /// Default test configuration.
    fn default_config() -> RateLawConfig<f32> {
        let mut config = RateLawConfig::<f32>::new();

        config.roll = AxisGains {
            p: 0.05,
            i: 0.1,
            d: 0.0,
            integrator_limit: 0.2,
        };
        config.pitch = AxisGains {
            p: 0.08,
            i: 0.1,
            d: 0.0,
            integrator_limit: 0.4,
        };
        config.yaw = AxisGains {
            p: 0.05,
            i: 0.1,
            d: 0.0,
            integrator_limit: 0.2,
        };

        config
    }

    fn input(set_point: (f32, f32, f32), rates: (f32, f32, f32)) -> RateLawInput<f32> {
        RateLawInput {
            rates,
            set_point,
            angular_accel: (0.0, 0.0, 0.0),
            dt: 0.01,
            landed: false,
            reset_integral: false,
        }
    }

    /// Test the initialization with a configuration.
    #[test]
    fn test_rate_law_initialization_with_config() {
        let config = default_config();
        let law = RateControlLaw::with_config(config);

        assert_eq!(law.roll_pid.kp, config.roll.p);
        assert_eq!(law.pitch_pid.kp, config.pitch.p);
        assert_eq!(law.yaw_pid.kp, config.yaw.p);
        assert_eq!(law.integrals(), (0.0, 0.0, 0.0));
    }

    /// Test the no error condition.
    #[test]
    fn test_rate_law_no_error() {
        let mut law = RateControlLaw::with_config(default_config());
        let output = law.control(input((0.0, 0.0, 0.0), (0.0, 0.0, 0.0)));
        assert!(
            vector_close((0.0, 0.0, 0.0), output),
            "Outputs should be zero as there is no error."
        );
    }

    /// Proportional-only roll response.
    #[test]
    fn test_rate_law_proportional_roll() {
        let mut config = RateLawConfig::<f32>::new();
        config.roll.p = 0.2;
        let mut law = RateControlLaw::with_config(config);
        let (roll, _, _) = law.control(input((0.5, 0.0, 0.0), (0.0, 0.0, 0.0)));
        assert!(value_close(0.1, roll), "Roll output should be 0.1.");
    }

    /// Test that the integrator saturation works as expected.
    #[test]
    fn test_rate_law_integrator_saturation() {
        let config = default_config();
        let mut law = RateControlLaw::with_config(config);

        for _ in 0..1000 {
            let _ = law.control(input((10.0, -10.0, 5.0), (0.0, 0.0, 0.0)));
        }

        let expected = (
            config.roll.integrator_limit,
            -config.pitch.integrator_limit,
            config.yaw.integrator_limit,
        );
        assert!(
            vector_close(expected, law.integrals()),
            "Integrals should be capped."
        );
    }

    /// Landed holds the integrator.
    #[test]
    fn test_rate_law_landed_suspends_integration() {
        let mut law = RateControlLaw::with_config(default_config());
        let _ = law.control(RateLawInput {
            landed: true,
            ..input((1.0, 1.0, 1.0), (0.0, 0.0, 0.0))
        });
        assert_eq!(law.integrals(), (0.0, 0.0, 0.0));
    }

    /// A reset request leaves every integrator at exactly zero.
    #[test]
    fn test_rate_law_reset_request() {
        let mut law = RateControlLaw::with_config(default_config());
        let _ = law.control(input((1.0, 1.0, 1.0), (0.0, 0.0, 0.0)));
        let integrals = law.integrals();
        assert!(
            vector_not_close((0.0, 0.0, 0.0), integrals),
            "Integrals should not be zero."
        );

        let _ = law.control(RateLawInput {
            reset_integral: true,
            ..input((1.0, 1.0, 1.0), (0.0, 0.0, 0.0))
        });
        assert_eq!(law.integrals(), (0.0, 0.0, 0.0));
    }

    /// Non-finite output on any axis resets every integrator.
    #[test]
    fn test_rate_law_non_finite_output_resets_all() {
        let mut law = RateControlLaw::with_config(default_config());
        let _ = law.control(input((1.0, 1.0, 1.0), (0.0, 0.0, 0.0)));

        let (_, pitch, _) = law.control(input((1.0, f32::NAN, 1.0), (0.0, 0.0, 0.0)));
        assert!(pitch.is_nan());
        assert_eq!(law.integrals(), (0.0, 0.0, 0.0));
    }

    /// Saturation feedback gates the matching axis only.
    #[test]
    fn test_rate_law_saturation_gates_axis() {
        let mut law = RateControlLaw::with_config(default_config());
        law.set_saturation_status(SaturationStatus {
            positive: [true, false, false],
            negative: [false, false, false],
        });
        let _ = law.control(input((1.0, 1.0, 1.0), (0.0, 0.0, 0.0)));
        let (roll, pitch, yaw) = law.integrals();
        assert_eq!(roll, 0.0, "Saturated roll should not integrate.");
        assert!(value_close(0.001, pitch));
        assert!(value_close(0.001, yaw));
    }

    /// Lowering the limit re-bounds the existing integrator.
    #[test]
    fn test_rate_law_set_gains_rebounds_integrator() {
        let mut config = default_config();
        let mut law = RateControlLaw::with_config(config);
        for _ in 0..1000 {
            let _ = law.control(input((10.0, 10.0, 10.0), (0.0, 0.0, 0.0)));
        }
        config.roll.integrator_limit = 0.05;
        law.set_gains(config);
        assert!(value_close(0.05, law.integrals().0));
        assert_eq!(law.gains().roll.integrator_limit, 0.05);
    }

    proptest! {
        #[test]
        fn integrator_never_exceeds_limit(
            steps in prop::collection::vec(
                (-50.0f32..50.0, -50.0f32..50.0, 0.002f32..0.04, any::<bool>(), any::<bool>()),
                1..200,
            )
        ) {
            let config = default_config();
            let mut law = RateControlLaw::with_config(config);
            for (error, accel, dt, sat_pos, sat_neg) in steps {
                law.set_saturation_status(SaturationStatus {
                    positive: [sat_pos; 3],
                    negative: [sat_neg; 3],
                });
                let _ = law.control(RateLawInput {
                    rates: (0.0, 0.0, 0.0),
                    set_point: (error, -error, error),
                    angular_accel: (accel, accel, accel),
                    dt,
                    landed: false,
                    reset_integral: false,
                });
                let (roll, pitch, yaw) = law.integrals();
                prop_assert!(roll.abs() <= config.roll.integrator_limit);
                prop_assert!(pitch.abs() <= config.pitch.integrator_limit);
                prop_assert!(yaw.abs() <= config.yaw.integrator_limit);
            }
        }

        #[test]
        fn positive_saturation_never_grows_integrator(
            errors in prop::collection::vec(-5.0f32..5.0, 1..100)
        ) {
            let mut law = RateControlLaw::with_config(default_config());
            law.set_saturation_status(SaturationStatus {
                positive: [true; 3],
                negative: [false; 3],
            });
            for error in errors {
                let before = law.integrals().0;
                let _ = law.control(input((error, 0.0, 0.0), (0.0, 0.0, 0.0)));
                prop_assert!(law.integrals().0 <= before);
            }
        }
    }
}
