//! Setup-time errors for scoring parameters

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PhotoConfigError {
    #[error("{field} must be within [0, 1], got {value}")]
    NotAFraction { field: &'static str, value: f32 },

    #[error("{min_field} ({min}) must not exceed {max_field} ({max})")]
    InvertedRange {
        min_field: &'static str,
        min: f32,
        max_field: &'static str,
        max: f32,
    },

    #[error("viewport must have a positive size, got {width}x{height}")]
    EmptyViewport { width: f32, height: f32 },
}

pub type Result<T> = std::result::Result<T, PhotoConfigError>;
