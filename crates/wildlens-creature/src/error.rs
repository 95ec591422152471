//! Setup-time rejection of invalid creature configuration.
//!
//! Nothing at tick time is an error: missing world objects degrade to the
//! idle/wander baseline. Only impossible parameter sets are rejected.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must be within [0, 1], got {value}")]
    NotAFraction { field: &'static str, value: f32 },

    #[error("{min_field} ({min}) exceeds {max_field} ({max})")]
    InvertedRange {
        min_field: &'static str,
        min: f32,
        max_field: &'static str,
        max: f32,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
