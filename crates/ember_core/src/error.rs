//! # Core Error Types
//!
//! Errors for validating externally supplied configuration before it reaches
//! the pool. Contract violations inside the engine itself panic instead.

use thiserror::Error;

/// Errors that can occur while validating particle system parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmberError {
    /// A pool must hold at least one slot.
    #[error("invalid capacity: pool must hold at least one particle, got {0}")]
    InvalidCapacity(usize),

    /// Life bounds must be finite, non-negative and ordered.
    #[error("invalid life range: min {min} / max {max} (need 0 <= min <= max)")]
    InvalidLifeRange {
        /// Requested minimum life in seconds.
        min: f32,
        /// Requested maximum life in seconds.
        max: f32,
    },

    /// A collaborator parameter is out of its valid domain.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Result type for core validation.
pub type EmberResult<T> = Result<T, EmberError>;

/// Validates a pool capacity.
///
/// # Errors
///
/// Returns [`EmberError::InvalidCapacity`] for zero.
pub fn validate_capacity(capacity: usize) -> EmberResult<usize> {
    if capacity == 0 {
        Err(EmberError::InvalidCapacity(capacity))
    } else {
        Ok(capacity)
    }
}
