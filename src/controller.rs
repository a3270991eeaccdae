// src/controller.rs

//! # Fixed-Wing Rate Controller
//!
//! The per-cycle orchestration around the rate law. A host scheduler calls
//! [`ControlCycle::run`] whenever a new angular velocity sample arrives, and
//! at least every [`BACKUP_INTERVAL`] otherwise. Each run reads the latest
//! telemetry through the [`bus`](crate::bus) channels, computes the actuator
//! command and publishes it.
//!
//! ## Usage
//!
//! ```
//! use std::time::Duration;
//!
//! use fixed_wing_rate_control::bus::{Publisher, Topic};
//! use fixed_wing_rate_control::config::ControlConfig;
//! use fixed_wing_rate_control::controller::{
//!     ControlCycle, CycleOutcome, CycleScheduler, Publications, Subscriptions,
//! };
//! use fixed_wing_rate_control::messages::RateSample;
//! use fixed_wing_rate_control::ControlResult;
//!
//! struct Clock(u64);
//!
//! impl CycleScheduler for Clock {
//!     fn register(&mut self) -> ControlResult<()> {
//!         Ok(())
//!     }
//!     fn unregister(&mut self) {}
//!     fn schedule_delayed(&mut self, _delay: Duration) {}
//!     fn now_us(&self) -> u64 {
//!         self.0
//!     }
//!     fn should_exit(&self) -> bool {
//!         false
//!     }
//! }
//!
//! let mut gyro = Topic::new();
//! let subs = Subscriptions {
//!     angular_velocity: Box::new(gyro.subscribe()),
//!     ..Subscriptions::default()
//! };
//!
//! let mut cycle =
//!     ControlCycle::new(ControlConfig::default(), Clock(1_000), subs, Publications::default())?;
//! cycle.init()?;
//!
//! gyro.publish(RateSample::default());
//! assert_eq!(cycle.run(), CycleOutcome::Ran);
//! assert_eq!(cycle.run(), CycleOutcome::Idle);
//! # Ok::<(), fixed_wing_rate_control::ControlError>(())
//! ```

pub mod cycle;
pub mod manual;
pub mod schedule;
pub mod surfaces;

pub use cycle::{ControlCycle, Publications, Subscriptions, DT_MAX, DT_MIN};
pub use schedule::{CycleOutcome, CycleScheduler, BACKUP_INTERVAL};
