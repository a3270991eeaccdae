// src/controller/schedule.rs

//! Host scheduler interface.
//!
//! The control cycle runs when a new rate sample arrives and, as a backup,
//! no later than [`BACKUP_INTERVAL`] after the previous run. The host
//! guarantees that runs never overlap.

use crate::error::ControlResult;
use std::time::Duration;

/// Maximum interval between cycles when the rate sample feed stalls.
pub const BACKUP_INTERVAL: Duration = Duration::from_millis(20);

/// Event source and clock the control cycle is attached to.
pub trait CycleScheduler {
    /// Attaches the cycle to the rate sample event source.
    fn register(&mut self) -> ControlResult<()>;

    /// Detaches the cycle from the event source.
    fn unregister(&mut self);

    /// Requests a run after `delay` unless a sample triggers one earlier.
    fn schedule_delayed(&mut self, delay: Duration);

    /// Monotonic host time in microseconds.
    fn now_us(&self) -> u64;

    /// Whether the host asked the controller to stop.
    fn should_exit(&self) -> bool;
}

/// What a call to [`ControlCycle::run`](super::ControlCycle::run) did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The control law pipeline ran.
    Ran,
    /// Neither a new sample nor the backup interval; nothing to do.
    Idle,
    /// Shutdown was requested; the cycle detached from its event source.
    Exited,
}
