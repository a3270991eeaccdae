// tests/control_cycle.rs

//! End-to-end runs of the control cycle over in-memory topics.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use fixed_wing_rate_control::bus::{Publisher, Topic};
use fixed_wing_rate_control::config::{ControlConfig, FlapsConfig};
use fixed_wing_rate_control::controller::{
    ControlCycle, CycleOutcome, CycleScheduler, Publications, Subscriptions,
};
use fixed_wing_rate_control::messages::*;
use fixed_wing_rate_control::ControlResult;

/// Host clock shared between the test and the cycle.
#[derive(Clone, Default)]
struct Host {
    now: Rc<Cell<u64>>,
    exit: Rc<Cell<bool>>,
}

impl CycleScheduler for Host {
    fn register(&mut self) -> ControlResult<()> {
        Ok(())
    }

    fn unregister(&mut self) {}

    fn schedule_delayed(&mut self, _delay: Duration) {}

    fn now_us(&self) -> u64 {
        self.now.get()
    }

    fn should_exit(&self) -> bool {
        self.exit.get()
    }
}

struct Rig {
    host: Host,
    cycle: ControlCycle<Host>,
    gyro: Topic<RateSample>,
    setpoint: Topic<RateSetpoint>,
    status: Topic<VehicleStatus>,
    mode: Topic<ControlMode>,
    manual: Topic<ManualControl>,
    land: Topic<LandDetected>,
    attitude: Topic<AttitudeSetpoint>,
    actuators: Topic<ActuatorCommand>,
    thrust: Topic<ThrustSetpoint>,
    rate_status: Topic<RateControlStatus>,
    power: Topic<ActuatorPowerStatus>,
    acro: Topic<RateSetpoint>,
}

impl Rig {
    fn new(config: ControlConfig) -> Self {
        let host = Host::default();
        let gyro = Topic::new();
        let setpoint = Topic::new();
        let status = Topic::new();
        let mode = Topic::new();
        let manual = Topic::new();
        let land = Topic::new();
        let attitude = Topic::new();
        let actuators = Topic::new();
        let thrust = Topic::new();
        let rate_status = Topic::new();
        let power = Topic::new();
        let acro = Topic::new();

        let subs = Subscriptions {
            angular_velocity: Box::new(gyro.subscribe()),
            rates_setpoint: Box::new(setpoint.subscribe()),
            attitude_setpoint: Box::new(attitude.subscribe()),
            vehicle_status: Box::new(status.subscribe()),
            control_mode: Box::new(mode.subscribe()),
            manual_control: Box::new(manual.subscribe()),
            land_detected: Box::new(land.subscribe()),
            ..Subscriptions::default()
        };
        let pubs = Publications {
            actuator_controls: Box::new(actuators.clone()),
            thrust_setpoint: Box::new(thrust.clone()),
            rate_ctrl_status: Box::new(rate_status.clone()),
            actuator_power: Box::new(power.clone()),
            rate_setpoint: Box::new(acro.clone()),
            ..Publications::default()
        };

        let mut cycle = ControlCycle::new(config, host.clone(), subs, pubs).unwrap();
        cycle.init().unwrap();

        let mut rig = Self {
            host,
            cycle,
            gyro,
            setpoint,
            status,
            mode,
            manual,
            land,
            attitude,
            actuators,
            thrust,
            rate_status,
            power,
            acro,
        };
        rig.status.publish(VehicleStatus {
            vehicle_type: VehicleType::FixedWing,
            ..Default::default()
        });
        rig.land.publish(LandDetected { landed: false });
        rig
    }

    fn tick(&mut self, now: u64) -> CycleOutcome {
        self.host.now.set(now);
        self.gyro.publish(RateSample {
            timestamp_sample: now,
            ..Default::default()
        });
        self.cycle.run()
    }
}

#[test]
fn stabilized_flight_publishes_command_status_and_thrust() {
    let mut rig = Rig::new(ControlConfig::default());
    rig.mode.publish(ControlMode {
        rates_enabled: true,
        attitude_enabled: true,
        ..Default::default()
    });
    rig.setpoint.publish(RateSetpoint {
        pitch: 0.2,
        thrust_body: [0.6, 0.0, 0.0],
        ..Default::default()
    });

    assert_eq!(rig.tick(1_000_000), CycleOutcome::Ran);

    let command = rig.actuators.latest().unwrap();
    assert!(command.pitch > 0.0);
    assert!((command.throttle - 0.6).abs() < 1e-6);
    assert_eq!(command.timestamp, 1_000_000);

    let thrust = rig.thrust.latest().unwrap();
    assert_eq!(thrust.xyz, [command.throttle, 0.0, 0.0]);

    let status = rig.rate_status.latest().unwrap();
    assert!(status.pitchspeed_integ > 0.0);
    assert_eq!(status.gains_p, [0.05, 0.08, 0.05]);
}

#[test]
fn commands_stay_bounded_and_finite_with_bad_inputs() {
    let mut rig = Rig::new(ControlConfig::default());
    rig.mode.publish(ControlMode {
        rates_enabled: true,
        ..Default::default()
    });
    rig.setpoint.publish(RateSetpoint {
        roll: f32::NAN,
        pitch: 50.0,
        yaw: f32::INFINITY,
        ..Default::default()
    });

    for i in 0..20 {
        rig.tick(1_000_000 + i * 10_000);
        let command = rig.actuators.latest().unwrap();
        for value in [command.roll, command.pitch, command.yaw] {
            assert!(value.is_finite());
            assert!((-1.0..=1.0).contains(&value));
        }
    }
    let status = rig.rate_status.latest().unwrap();
    assert_eq!(status.rollspeed_integ, 0.0);
    assert!(status.pitchspeed_integ.abs() <= 0.4);
}

#[test]
fn power_estimate_published_after_window() {
    let mut rig = Rig::new(ControlConfig::default());
    rig.mode.publish(ControlMode {
        rates_enabled: true,
        ..Default::default()
    });
    rig.setpoint.publish(RateSetpoint {
        thrust_body: [1.0, 0.0, 0.0],
        ..Default::default()
    });

    // First tick runs on the host clock with the maximum period, the rest at 40 ms.
    let mut now = 1_000_000;
    rig.tick(now);
    for _ in 0..11 {
        now += 40_000;
        rig.tick(now);
    }
    assert_eq!(rig.power.publish_count(), 0);

    now += 40_000;
    rig.tick(now);
    assert_eq!(rig.power.publish_count(), 1);
    let power = rig.power.latest().unwrap();
    assert!((power.control_power[3] - 1.0).abs() < 1e-3);
}

#[test]
fn acro_sticks_become_rate_setpoint() {
    let mut rig = Rig::new(ControlConfig::default());
    rig.mode.publish(ControlMode {
        manual_enabled: true,
        rates_enabled: true,
        ..Default::default()
    });
    rig.manual.publish(ManualControl {
        roll: 1.0,
        throttle: 1.0,
        ..Default::default()
    });

    rig.tick(1_000_000);

    let setpoint = rig.acro.latest().unwrap();
    assert!((setpoint.roll - 90.0_f32.to_radians()).abs() < 1e-5);
    assert_eq!(setpoint.thrust_body[0], 1.0);
    let command = rig.actuators.latest().unwrap();
    assert!(command.roll > 0.0);
    assert_eq!(command.throttle, 1.0);
}

#[test]
fn landing_flaps_ramp_at_slew_rate() {
    let config = ControlConfig {
        flaps: FlapsConfig {
            landing_scale: 1.0,
            takeoff_scale: 0.0,
            slew_rate: 0.5,
        },
        ..ControlConfig::default()
    };
    let mut rig = Rig::new(config);
    rig.mode.publish(ControlMode {
        auto_enabled: true,
        attitude_enabled: true,
        rates_enabled: true,
        ..Default::default()
    });
    rig.attitude.publish(AttitudeSetpoint {
        apply_flaps: FlapsMode::Land,
        ..Default::default()
    });

    rig.tick(1_000_000);
    let first = rig.actuators.latest().unwrap().flaps;
    assert!((first - 0.02).abs() < 1e-6);

    rig.tick(1_040_000);
    let second = rig.actuators.latest().unwrap().flaps;
    assert!((second - 0.04).abs() < 1e-6);
}

#[test]
fn shutdown_stops_the_cycle() {
    let mut rig = Rig::new(ControlConfig::default());
    rig.host.exit.set(true);
    assert_eq!(rig.tick(1_000_000), CycleOutcome::Exited);
    assert_eq!(rig.actuators.publish_count(), 0);
}

fn assert_finite(command: &ActuatorCommand) {
    let fields = [
        command.roll,
        command.pitch,
        command.yaw,
        command.throttle,
        command.flaps,
        command.spoilers,
        command.airbrakes,
        command.landing_gear,
    ];
    assert!(fields.iter().all(|v| v.is_finite()), "{command:?}");
}

#[test]
fn unassigned_manual_channels_publish_finite_commands() {
    let unassigned = ManualControl {
        roll: f32::NAN,
        pitch: f32::NAN,
        yaw: f32::NAN,
        throttle: f32::NAN,
        flaps: f32::NAN,
        aux1: f32::NAN,
        aux3: f32::NAN,
    };

    // Direct manual.
    let mut rig = Rig::new(ControlConfig {
        roll_to_yaw_feedforward: 0.3,
        ..ControlConfig::default()
    });
    rig.mode.publish(ControlMode {
        manual_enabled: true,
        ..Default::default()
    });
    rig.manual.publish(unassigned);
    rig.tick(1_000_000);
    let command = rig.actuators.latest().unwrap();
    assert_finite(&command);
    assert_eq!(command.landing_gear, 0.0);
    assert_eq!(command.throttle, 0.0);

    // Stabilized.
    let mut rig = Rig::new(ControlConfig::default());
    rig.mode.publish(ControlMode {
        manual_enabled: true,
        attitude_enabled: true,
        rates_enabled: true,
        ..Default::default()
    });
    rig.manual.publish(unassigned);
    rig.tick(1_000_000);
    let command = rig.actuators.latest().unwrap();
    assert_finite(&command);
    assert_eq!(command.landing_gear, 0.0);
}
