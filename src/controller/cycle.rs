// src/controller/cycle.rs

//! # Control Cycle
//!
//! [`ControlCycle`] owns every piece of cross-call state and sequences one
//! pass of the controller: timing, input snapshot, manual poll, auxiliary
//! surfaces, rate law, blending and publication.
//!
//! Inputs keep their previous value when no new sample arrived. A stale or
//! missing input never stops the cycle.

use tracing::{debug, info, warn};

use crate::airspeed::AirspeedScaler;
use crate::blender::{apply_roll_to_yaw, ActuatorBlender, AxisBlendInput};
use crate::bus::{LatestValueChannel, Publisher, Silent};
use crate::config::ControlConfig;
use crate::controller::manual::{manual_command, ManualCommand};
use crate::controller::schedule::{CycleOutcome, CycleScheduler, BACKUP_INTERVAL};
use crate::controller::surfaces::{flaps_target, spoilers_target, AuxiliarySurfaces};
use crate::energy::ActuatorEnergyAccumulator;
use crate::error::ControlResult;
use crate::messages::{
    ActuatorCommand, ActuatorPowerStatus, AirspeedSample, AllocatorStatus, AttitudeSetpoint,
    BatteryStatus, ControlMode, LandDetected, ManualControl, RateControlStatus, RateSample,
    RateSetpoint, ThrustSetpoint, TorqueSetpoint, VehicleStatus,
};
use crate::trim::TrimScheduler;
use crate::{FlightStabilizer, Number, RateControlLaw, RateLawInput, SaturationStatus};

/// Shortest accepted cycle period, in seconds.
pub const DT_MIN: f32 = 0.002;

/// Longest accepted cycle period, in seconds.
pub const DT_MAX: f32 = 0.04;

/// Input channels. Unconnected inputs default to [`Silent`].
pub struct Subscriptions {
    /// Body rates and accelerations; a new sample triggers a cycle.
    pub angular_velocity: Box<dyn LatestValueChannel<RateSample>>,
    /// Commanded body rates.
    pub rates_setpoint: Box<dyn LatestValueChannel<RateSetpoint>>,
    /// Flap and spoiler selectors.
    pub attitude_setpoint: Box<dyn LatestValueChannel<AttitudeSetpoint>>,
    /// Airframe and VTOL phase.
    pub vehicle_status: Box<dyn LatestValueChannel<VehicleStatus>>,
    /// Enabled control loops.
    pub control_mode: Box<dyn LatestValueChannel<ControlMode>>,
    /// Pilot sticks and switches.
    pub manual_control: Box<dyn LatestValueChannel<ManualControl>>,
    /// Land detector.
    pub land_detected: Box<dyn LatestValueChannel<LandDetected>>,
    /// Validated airspeed.
    pub airspeed: Box<dyn LatestValueChannel<AirspeedSample>>,
    /// Saturation feedback from the control allocation.
    pub allocator_status: Box<dyn LatestValueChannel<AllocatorStatus>>,
    /// Battery scale for throttle compensation.
    pub battery_status: Box<dyn LatestValueChannel<BatteryStatus>>,
    /// Parameter updates, polled every cycle.
    pub parameters: Box<dyn LatestValueChannel<ControlConfig>>,
}

impl Default for Subscriptions {
    fn default() -> Self {
        Self {
            angular_velocity: Box::new(Silent),
            rates_setpoint: Box::new(Silent),
            attitude_setpoint: Box::new(Silent),
            vehicle_status: Box::new(Silent),
            control_mode: Box::new(Silent),
            manual_control: Box::new(Silent),
            land_detected: Box::new(Silent),
            airspeed: Box::new(Silent),
            allocator_status: Box::new(Silent),
            battery_status: Box::new(Silent),
            parameters: Box::new(Silent),
        }
    }
}

/// Output channels. Unconnected outputs default to [`Silent`].
pub struct Publications {
    /// Normalized actuator command.
    pub actuator_controls: Box<dyn Publisher<ActuatorCommand>>,
    /// Torque setpoint, non-VTOL only.
    pub torque_setpoint: Box<dyn Publisher<TorqueSetpoint>>,
    /// Thrust setpoint, non-VTOL only.
    pub thrust_setpoint: Box<dyn Publisher<ThrustSetpoint>>,
    /// Rate law gains, integrators and saturation.
    pub rate_ctrl_status: Box<dyn Publisher<RateControlStatus>>,
    /// Windowed actuator power estimate.
    pub actuator_power: Box<dyn Publisher<ActuatorPowerStatus>>,
    /// Rate setpoints generated from the sticks in acro mode.
    pub rate_setpoint: Box<dyn Publisher<RateSetpoint>>,
}

impl Default for Publications {
    fn default() -> Self {
        Self {
            actuator_controls: Box::new(Silent),
            torque_setpoint: Box::new(Silent),
            thrust_setpoint: Box::new(Silent),
            rate_ctrl_status: Box::new(Silent),
            actuator_power: Box::new(Silent),
            rate_setpoint: Box::new(Silent),
        }
    }
}

/// Cycle period and the reference time for the next one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CycleTiming {
    /// Cycle period in seconds.
    pub dt: f32,
    /// Reference timestamp for the next cycle.
    pub last_run: u64,
    /// `dt` came from the host clock.
    pub wall_clock: bool,
}

/// Derives `dt` from the sample timestamp, or from the host clock when
/// there is no sample or its interval is outside `[DT_MIN, DT_MAX]`.
pub(crate) fn cycle_timing(sample_timestamp: Option<u64>, last_run: u64, now_us: u64) -> CycleTiming {
    if let Some(timestamp) = sample_timestamp {
        let dt = timestamp.saturating_sub(last_run) as f32 * 1e-6;
        if (DT_MIN..=DT_MAX).contains(&dt) {
            return CycleTiming {
                dt,
                last_run: timestamp,
                wall_clock: false,
            };
        }
    }

    let elapsed = now_us.saturating_sub(last_run) as f32 * 1e-6;
    CycleTiming {
        dt: elapsed.constrain(DT_MIN, DT_MAX),
        last_run: now_us,
        wall_clock: true,
    }
}

/// Tailsitters fly fixed-wing with the body frame rotated about pitch:
/// roll becomes yaw and yaw becomes negative roll.
pub(crate) fn tailsitter_swap([roll, pitch, yaw]: [f32; 3]) -> [f32; 3] {
    [-yaw, pitch, roll]
}

/// Per-axis saturation from the allocator's unallocated torque.
pub(crate) fn saturation_from_allocator(status: &AllocatorStatus) -> SaturationStatus {
    let mut saturation = SaturationStatus::default();
    if !status.torque_setpoint_achieved {
        for (axis, &torque) in status.unallocated_torque.iter().enumerate() {
            saturation.positive[axis] = torque > f32::EPSILON;
            saturation.negative[axis] = torque < -f32::EPSILON;
        }
    }
    saturation
}

/// The fixed-wing rate controller attached to a host scheduler.
pub struct ControlCycle<S: CycleScheduler> {
    scheduler: S,
    subs: Subscriptions,
    pubs: Publications,

    config: ControlConfig,
    law: RateControlLaw<f32>,
    airspeed_scaler: AirspeedScaler,
    trim_scheduler: TrimScheduler,
    blender: ActuatorBlender,
    surfaces: AuxiliarySurfaces,
    energy: ActuatorEnergyAccumulator,

    rate_sample: RateSample,
    rates_sp: RateSetpoint,
    att_sp: AttitudeSetpoint,
    vehicle_status: VehicleStatus,
    control_mode: ControlMode,
    manual: Option<ManualControl>,
    airspeed: Option<AirspeedSample>,
    landed: bool,

    last_run: u64,
}

impl<S: CycleScheduler> ControlCycle<S> {
    /// Creates a controller from a validated parameter set.
    pub fn new(
        config: ControlConfig,
        scheduler: S,
        subs: Subscriptions,
        pubs: Publications,
    ) -> ControlResult<Self> {
        config.validate()?;

        Ok(Self {
            scheduler,
            subs,
            pubs,
            law: RateControlLaw::with_config(config.rate_law_config()),
            airspeed_scaler: AirspeedScaler::new(config.airspeed),
            trim_scheduler: TrimScheduler::new(config.trim, config.airspeed),
            blender: ActuatorBlender::new(),
            surfaces: AuxiliarySurfaces::new(&config.flaps, &config.spoilers),
            energy: ActuatorEnergyAccumulator::new(),
            config,
            rate_sample: RateSample::default(),
            rates_sp: RateSetpoint::default(),
            att_sp: AttitudeSetpoint::default(),
            vehicle_status: VehicleStatus::default(),
            control_mode: ControlMode::default(),
            manual: None,
            airspeed: None,
            landed: true,
            last_run: 0,
        })
    }

    /// Attaches the cycle to the rate sample event source.
    pub fn init(&mut self) -> ControlResult<()> {
        self.scheduler.register()?;
        info!("fixed-wing rate control registered");
        Ok(())
    }

    /// Validates and applies a new parameter set. A rejected set leaves the
    /// current parameters in place.
    pub fn update_parameters(&mut self, config: ControlConfig) -> ControlResult<()> {
        if let Err(err) = config.validate() {
            warn!("parameter update rejected: {err}");
            return Err(err);
        }

        self.law.set_gains(config.rate_law_config());
        self.airspeed_scaler.set_config(config.airspeed);
        self.trim_scheduler.set_config(config.trim, config.airspeed);
        self.surfaces.set_slew_rates(&config.flaps, &config.spoilers);
        self.config = config;

        info!("rate control parameters updated");
        Ok(())
    }

    /// Host callback. Runs the pipeline on a new rate sample or when the
    /// backup interval elapsed, then requests the next backup wake-up.
    pub fn run(&mut self) -> CycleOutcome {
        if self.scheduler.should_exit() {
            self.scheduler.unregister();
            info!("fixed-wing rate control stopped");
            return CycleOutcome::Exited;
        }

        let now = self.scheduler.now_us();
        let sample = self.subs.angular_velocity.try_read();
        let backup_due =
            now.saturating_sub(self.last_run) > BACKUP_INTERVAL.as_micros() as u64;

        let outcome = if sample.is_some() || backup_due {
            self.cycle(sample, now);
            CycleOutcome::Ran
        } else {
            CycleOutcome::Idle
        };

        self.scheduler.schedule_delayed(BACKUP_INTERVAL);
        outcome
    }

    /// Current parameter set.
    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    /// The rate control law.
    pub fn law(&self) -> &RateControlLaw<f32> {
        &self.law
    }

    /// Slew limited flap and spoiler positions.
    pub fn surfaces(&self) -> &AuxiliarySurfaces {
        &self.surfaces
    }

    /// Reference timestamp of the last cycle, in microseconds.
    pub fn last_run(&self) -> u64 {
        self.last_run
    }

    /// The host scheduler.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// The host scheduler, mutably.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    fn poll_inputs(&mut self) {
        if let Some(sp) = self.subs.rates_setpoint.try_read() {
            self.rates_sp = sp;
        }
        if let Some(sp) = self.subs.attitude_setpoint.try_read() {
            self.att_sp = sp;
        }
        if let Some(status) = self.subs.vehicle_status.try_read() {
            self.vehicle_status = status;
        }
        if let Some(mode) = self.subs.control_mode.try_read() {
            self.control_mode = mode;
        }
        if let Some(manual) = self.subs.manual_control.try_read() {
            self.manual = Some(manual);
        }
        if let Some(land) = self.subs.land_detected.try_read() {
            self.landed = land.landed;
        }
        if let Some(airspeed) = self.subs.airspeed.try_read() {
            self.airspeed = Some(airspeed);
        }
        if let Some(status) = self.subs.allocator_status.try_read() {
            self.law.set_saturation_status(saturation_from_allocator(&status));
        }
        if let Some(battery) = self.subs.battery_status.try_read() {
            self.blender.update_battery(&battery);
        }
    }

    fn cycle(&mut self, sample: Option<RateSample>, now: u64) {
        if let Some(config) = self.subs.parameters.try_read() {
            if self.update_parameters(config).is_err() {
                debug!("keeping previous parameters");
            }
        }

        let timing = cycle_timing(sample.map(|s| s.timestamp_sample), self.last_run, now);
        if timing.wall_clock {
            debug!("dt from host clock: {:.4} s", timing.dt);
        }
        self.last_run = timing.last_run;
        let dt = timing.dt;

        if let Some(sample) = sample {
            self.rate_sample = sample;
        }
        self.poll_inputs();

        let in_fw = self.vehicle_status.in_fw_or_transition_wo_tailsitter();

        let mut rates = self.rate_sample.xyz;
        if self.vehicle_status.is_vtol_tailsitter {
            rates = tailsitter_swap(rates);
        }
        let angular_accel = self.rate_sample.xyz_derivative;

        let mut command = ActuatorCommand::default();

        if let Some(manual) = self.manual {
            match manual_command(
                &self.control_mode,
                &manual,
                in_fw,
                &self.config.manual,
                &self.config.trim,
                now,
            ) {
                Some(ManualCommand::Rates(sp)) => {
                    self.rates_sp = sp;
                    self.pubs.rate_setpoint.publish(sp);
                }
                Some(ManualCommand::Direct {
                    roll,
                    pitch,
                    yaw,
                    throttle,
                }) => {
                    command.roll = roll;
                    command.pitch = pitch;
                    command.yaw = yaw;
                    command.throttle = throttle;
                }
                None => {}
            }
        }

        if self.vehicle_status.is_pure_rotary_wing() {
            self.surfaces.force_retracted();
            self.law.reset_integral();
            return;
        }

        let flaps = flaps_target(
            &self.control_mode,
            self.manual.as_ref(),
            &self.att_sp,
            &self.config.flaps,
        );
        let spoilers = spoilers_target(
            &self.control_mode,
            self.manual.as_ref(),
            &self.att_sp,
            &self.config.spoilers,
        );
        self.surfaces.update(flaps, spoilers, dt);

        if self.control_mode.rates_enabled {
            let sp = self.rates_sp;
            let scaling = self
                .airspeed_scaler
                .compute(self.airspeed.as_ref(), now, &self.vehicle_status);
            let trim = self.trim_scheduler.compute(
                scaling.airspeed,
                self.surfaces.flaps(),
                self.surfaces.spoilers(),
            );

            let law_output = self.law.control(RateLawInput {
                rates: (rates[0], rates[1], rates[2]),
                set_point: (sp.roll, sp.pitch, sp.yaw),
                angular_accel: (angular_accel[0], angular_accel[1], angular_accel[2]),
                dt,
                landed: self.landed,
                reset_integral: sp.reset_integral || self.landed || !in_fw,
            });

            let axes = self.blender.blend_axes(&AxisBlendInput {
                law_output,
                rate_setpoint: (sp.roll, sp.pitch, sp.yaw),
                feedforward_gain: self.config.feedforward(),
                scale: scaling.scale,
                trim,
            });
            if axes.reset_integral {
                warn!("non-finite actuator command, holding trim and resetting integrators");
                self.law.reset_integral();
            }

            command.roll = axes.roll;
            command.pitch = axes.pitch;
            command.yaw = axes.yaw;
            command.throttle = self
                .blender
                .throttle(sp.thrust_body[0], self.config.battery_scaling_enabled);

            self.publish_status(now);
        } else {
            self.law.reset_integral();
        }

        apply_roll_to_yaw(&mut command, self.config.roll_to_yaw_feedforward);

        command.flaps = self.surfaces.flaps();
        command.spoilers = self.surfaces.spoilers();
        command.airbrakes = 0.0;
        command.landing_gear = self
            .manual
            .map(|m| m.aux3)
            .filter(|gear| gear.is_finite())
            .unwrap_or(0.0);
        command.timestamp = now;
        command.timestamp_sample = self.rate_sample.timestamp_sample;

        let mode = &self.control_mode;
        if mode.rates_enabled || mode.attitude_enabled || mode.manual_enabled {
            self.pubs.actuator_controls.publish(command);

            if !self.vehicle_status.is_vtol {
                self.pubs.torque_setpoint.publish(TorqueSetpoint {
                    timestamp: now,
                    timestamp_sample: command.timestamp_sample,
                    xyz: [command.roll, command.pitch, command.yaw],
                });
                self.pubs.thrust_setpoint.publish(ThrustSetpoint {
                    timestamp: now,
                    timestamp_sample: command.timestamp_sample,
                    xyz: [command.throttle, 0.0, 0.0],
                });
            }
        }

        if let Some(control_power) = self.energy.update(command.power_channels(), dt) {
            debug!("actuator power {control_power:?}");
            self.pubs.actuator_power.publish(ActuatorPowerStatus {
                timestamp: now,
                control_power,
            });
        }
    }

    fn publish_status(&mut self, now: u64) {
        let (roll, pitch, yaw) = self.law.integrals();
        let saturation = self.law.saturation_status();
        let gains = self.law.gains();
        self.pubs.rate_ctrl_status.publish(RateControlStatus {
            timestamp: now,
            rollspeed_integ: roll,
            pitchspeed_integ: pitch,
            yawspeed_integ: yaw,
            saturation_positive: saturation.positive,
            saturation_negative: saturation.negative,
            gains_p: [gains.roll.p, gains.pitch.p, gains.yaw.p],
            gains_i: [gains.roll.i, gains.pitch.i, gains.yaw.i],
            gains_d: [gains.roll.d, gains.pitch.d, gains.yaw.d],
        });
    }
}
