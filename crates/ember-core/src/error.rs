//! Error types for Ember

use thiserror::Error;

/// Configuration errors, raised when options are validated rather than
/// surfacing mid-simulation
#[derive(Debug, Error, PartialEq)]
pub enum EmberError {
    #[error("Invalid emission rate: {0} (must be a finite value greater than zero)")]
    InvalidRate(f64),

    #[error("Invalid loop duration: {0} (must be a finite value greater than zero)")]
    InvalidDuration(f64),

    #[error("Invalid particle capacity: {0}")]
    InvalidCapacity(usize),

    #[error("Invalid range for {field}: min {min} is greater than max {max}")]
    InvalidRange { field: String, min: f32, max: f32 },
}

/// Result type alias for Ember operations
pub type Result<T> = std::result::Result<T, EmberError>;
