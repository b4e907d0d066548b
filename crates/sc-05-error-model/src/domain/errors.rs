//! Error types for the Error Model Subsystem

use thiserror::Error;

/// All errors that can occur while adding noise or extracting an error model
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorModelError {
    /// Noise probability outside `[0, 1]`
    #[error("Invalid noise probability {probability}: expected a value in [0, 1]")]
    InvalidProbability { probability: f64 },

    /// A record offset points outside the measurements taken so far
    #[error("Record offset {offset} is out of range: only {available} measurement(s) available")]
    InvalidRecord { offset: i64, available: usize },

    /// Observable masks are 64 bits wide
    #[error("Observable index {index} exceeds the supported maximum of 63")]
    TooManyObservables { index: usize },

    /// Target list is not a multiple of the operation arity
    #[error("{operation} expects targets in groups of {arity}, got {count}")]
    InvalidTargets {
        operation: String,
        arity: usize,
        count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ErrorModelError::InvalidRecord {
            offset: -3,
            available: 2,
        };
        assert_eq!(
            err.to_string(),
            "Record offset -3 is out of range: only 2 measurement(s) available"
        );

        let err = ErrorModelError::InvalidTargets {
            operation: "CX".to_string(),
            arity: 2,
            count: 3,
        };
        assert!(err.to_string().contains("groups of 2"));
    }
}
