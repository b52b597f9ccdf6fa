//! Error Types for the Correction Engine
//!
//! ## Design Philosophy
//!
//! The engine runs inside a control loop, often at 1 kHz, so errors follow
//! the same rules as the rest of the hot path:
//!
//! 1. **Small Size**: Variants carry only integers and `&'static str`, no
//!    heap allocation.
//!
//! 2. **Copy Semantics**: Errors are `Copy` so they can be returned, logged
//!    and stored without ownership juggling.
//!
//! 3. **Fail Fast at the Boundary**: Malformed configuration or requests are
//!    rejected before any engine state is touched. A rejected call leaves the
//!    rolling history exactly as it was.
//!
//! ## Error Categories
//!
//! ### Construction
//! - `InvalidDimension`: zero-dimensional state vector
//! - `InvalidConfig`: a configuration field outside its valid domain
//! - `ConfigLoad`: configuration file could not be read or parsed
//!
//! ### Per-Call
//! - `DimensionMismatch`: a request vector does not match the engine dimension
//! - `NonFiniteInput`: NaN or infinity inside a request vector
//!
//! ## What Is Not an Error
//!
//! A cold, absent or failing episodic memory is a *degraded* condition, not
//! an error. The engine substitutes a zero bias and keeps running; see
//! [`crate::memory::MemoryRecall`].
//!
//! ```rust
//! use cerebellum_core::{CerebellumEngine, CerebellumConfig, CerebellumError, CorrectionRequest};
//!
//! let mut engine = CerebellumEngine::new(3, CerebellumConfig::default()).unwrap();
//!
//! match engine.compute_correction(CorrectionRequest::new(&[0.0; 2], &[1.0; 3])) {
//!     Err(CerebellumError::DimensionMismatch { vector, expected, actual }) => {
//!         assert_eq!((vector, expected, actual), ("current_state", 3, 2));
//!     }
//!     _ => unreachable!(),
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for engine operations
pub type CerebellumResult<T> = Result<T, CerebellumError>;

/// Engine errors - kept small and `Copy` for control-loop use
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CerebellumError {
    /// State dimension must be at least one
    #[error("Invalid state dimension {dimension}: must be positive")]
    InvalidDimension {
        /// The rejected dimension
        dimension: usize,
    },

    /// Configuration field outside its valid domain
    #[error("Invalid configuration: {field} {reason}")]
    InvalidConfig {
        /// Name of the offending field
        field: &'static str,
        /// What the field must satisfy
        reason: &'static str,
    },

    /// Request vector length differs from the engine dimension
    #[error("Dimension mismatch in {vector}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Which request vector was wrong
        vector: &'static str,
        /// Engine dimension
        expected: usize,
        /// Length actually supplied
        actual: usize,
    },

    /// Request vector contains NaN or infinity
    #[error("Non-finite value in {vector}")]
    NonFiniteInput {
        /// Which request vector was wrong
        vector: &'static str,
    },

    /// Configuration source could not be read or parsed
    #[error("Failed to load configuration: {reason}")]
    ConfigLoad {
        /// Short description of the failure
        reason: &'static str,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for CerebellumError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidDimension { dimension } =>
                defmt::write!(fmt, "Invalid dimension {}", dimension),
            Self::InvalidConfig { field, reason } =>
                defmt::write!(fmt, "Config {}: {}", field, reason),
            Self::DimensionMismatch { vector, expected, actual } =>
                defmt::write!(fmt, "{}: expected {} got {}", vector, expected, actual),
            Self::NonFiniteInput { vector } =>
                defmt::write!(fmt, "Non-finite {}", vector),
            Self::ConfigLoad { reason } =>
                defmt::write!(fmt, "Config load: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn error_messages_name_the_vector() {
        let err = CerebellumError::DimensionMismatch {
            vector: "velocity",
            expected: 5,
            actual: 3,
        };
        assert_eq!(err.to_string(), "Dimension mismatch in velocity: expected 5, got 3");
    }

    #[test]
    fn errors_stay_small() {
        // Two &'static str fat pointers plus discriminant
        assert!(core::mem::size_of::<CerebellumError>() <= 40);
    }
}
