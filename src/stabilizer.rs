// src/stabilizer.rs

//! # Rate Stabilization Module
//!
//! This module provides the three-axis rate control law and the shared
//! types it is configured and driven with.

pub mod flight_stabilizer;
pub use flight_stabilizer::*;
pub mod rate;
pub use rate::*;
