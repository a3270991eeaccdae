// src/lib.rs

//! # Fixed-Wing Rate Controller
//!
//! Per-cycle angular rate control for fixed-wing aircraft and VTOLs in
//! fixed-wing flight: a three-axis rate PID with saturation-aware
//! anti-windup, airspeed scaling of surface effectiveness, airspeed
//! scheduled trims, rate limited flaps and spoilers, and actuator power
//! estimation.
//!
//! The rate law itself ([`RateControlLaw`]) is generic over [`Number`] and
//! usable on its own. [`controller::ControlCycle`] wires it to telemetry
//! channels and a host scheduler.

#![deny(missing_docs)]

pub mod airspeed;
pub mod blender;
pub mod bus;
pub mod config;
pub mod controller;
pub mod energy;
pub mod error;
pub mod messages;
pub mod pid;
pub mod slew;
pub mod stabilizer;
pub mod trim;

#[doc(inline)]
pub use stabilizer::*;

pub use error::{ControlError, ControlResult};

#[cfg(test)]
mod test_utils;
