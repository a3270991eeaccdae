// src/error.rs

//! Error types for controller setup and configuration.
//!
//! Nothing in the per-cycle path returns these. Stale inputs, out-of-range
//! timing and non-finite axis values all resolve to fallback values inside
//! the cycle.

use thiserror::Error;

/// Result type for controller operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur while bringing up or configuring the controller.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// The scheduler could not attach the cycle to its event source.
    #[error("callback registration failed: {reason}")]
    Registration {
        /// Why the event source refused the callback.
        reason: String,
    },

    /// A parameter set was rejected.
    #[error("invalid configuration: {what}")]
    InvalidConfig {
        /// The violated constraint.
        what: &'static str,
    },
}
