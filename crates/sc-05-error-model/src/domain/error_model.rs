//! Detector error models

use std::fmt;

use serde::{Deserialize, Serialize};
use shared_types::Circuit;

use super::errors::ErrorModelError;
use crate::algorithms::{distance, propagation};

/// Independent error: with `probability` it flips `detectors` and the
/// observables set in `observables`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorMechanism {
    pub probability: f64,
    /// Sorted detector indices
    pub detectors: Vec<usize>,
    /// Bit `i` set when observable `i` is flipped
    pub observables: u64,
}

impl ErrorMechanism {
    /// Flips at most two detectors, and so is an edge of the matching graph.
    pub fn is_graphlike(&self) -> bool {
        self.detectors.len() <= 2
    }
}

/// Error mechanisms of a noisy circuit, merged by symptom.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectorErrorModel {
    num_detectors: usize,
    num_observables: usize,
    errors: Vec<ErrorMechanism>,
}

impl DetectorErrorModel {
    pub fn new(num_detectors: usize, num_observables: usize, errors: Vec<ErrorMechanism>) -> Self {
        Self {
            num_detectors,
            num_observables,
            errors,
        }
    }

    /// Model of every noise channel in `circuit`, by Pauli propagation.
    pub fn from_circuit(circuit: &Circuit) -> Result<Self, ErrorModelError> {
        propagation::extract_error_model(circuit)
    }

    pub fn num_detectors(&self) -> usize {
        self.num_detectors
    }

    pub fn num_observables(&self) -> usize {
        self.num_observables
    }

    pub fn errors(&self) -> &[ErrorMechanism] {
        &self.errors
    }

    /// Smallest set of graphlike mechanisms that flips an observable without
    /// triggering any detector. `None` when no such set exists.
    pub fn shortest_graphlike_error(&self) -> Option<Vec<ErrorMechanism>> {
        distance::shortest_graphlike_error(self)
    }
}

impl fmt::Display for DetectorErrorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            write!(f, "error({})", error.probability)?;
            for detector in &error.detectors {
                write!(f, " D{detector}")?;
            }
            for observable in 0..u64::BITS {
                if error.observables >> observable & 1 == 1 {
                    write!(f, " L{observable}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let model = DetectorErrorModel::new(
            3,
            2,
            vec![
                ErrorMechanism {
                    probability: 0.125,
                    detectors: vec![0, 2],
                    observables: 0,
                },
                ErrorMechanism {
                    probability: 0.5,
                    detectors: vec![1],
                    observables: 0b10,
                },
            ],
        );
        assert_eq!(model.to_string(), "error(0.125) D0 D2\nerror(0.5) D1 L1\n");
    }

    #[test]
    fn test_graphlike() {
        let mut error = ErrorMechanism {
            probability: 0.1,
            detectors: vec![0, 1],
            observables: 0,
        };
        assert!(error.is_graphlike());
        error.detectors.push(4);
        assert!(!error.is_graphlike());
    }
}
