//! # Error Types
//!
//! Errors raised by the shared value types.

use thiserror::Error;

/// Errors raised by scalable quantity arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScaleError {
    /// Exact division requested with a divisor that is not strictly positive.
    #[error("Cannot divide by {divisor}: divisor must be a positive integer")]
    NonPositiveDivisor { divisor: i64 },

    /// One of the two coefficients is not a multiple of the divisor.
    #[error("{function} is not exactly divisible by {divisor}")]
    NotDivisible { function: String, divisor: i64 },
}

/// Errors raised while building or querying a qubit map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QubitMapError {
    /// The same qubit was listed twice.
    #[error("Duplicate qubit {qubit} in qubit map")]
    DuplicateQubit { qubit: String },

    /// A qubit that is not part of the map was looked up.
    #[error("Qubit {qubit} is not part of the qubit map")]
    UnknownQubit { qubit: String },
}
