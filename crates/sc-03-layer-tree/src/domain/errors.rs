//! Error types for the Layer Tree Subsystem

use sc_01_plaquettes::PlaquetteError;
use sc_02_layers::LayerError;
use shared_types::QubitMapError;
use thiserror::Error;

/// All errors that can occur while annotating a layer tree or emitting its circuit
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A repetition evaluates to a negative count at the requested scale
    #[error("Repetition count {repetitions} is negative for k = {k}")]
    NegativeRepetitions { repetitions: String, k: u32 },

    /// A detector or observable references a qubit the leaf never measures
    #[error("Qubit {qubit} is not measured in leaf {leaf}")]
    MissingMeasurement { qubit: String, leaf: usize },

    /// An observable is read out but the tree has no executed leaf
    #[error("Observable {name} cannot be read out: no layer is executed for k = {k}")]
    NoFinalLayer { name: String, k: u32 },

    /// Annotation expected by the emitter was never computed
    #[error("Missing annotation: {0}")]
    MissingAnnotation(String),

    /// Local pattern could not be fingerprinted
    #[error("Fingerprint encoding failed: {0}")]
    Encoding(String),

    #[error(transparent)]
    Layer(#[from] LayerError),

    #[error(transparent)]
    Plaquette(#[from] PlaquetteError),

    #[error("Qubit map error: {0}")]
    QubitMap(#[from] QubitMapError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TreeError::NegativeRepetitions {
            repetitions: "2k - 1".to_string(),
            k: 0,
        };
        assert_eq!(err.to_string(), "Repetition count 2k - 1 is negative for k = 0");

        let err = TreeError::MissingMeasurement {
            qubit: "(2, 2)".to_string(),
            leaf: 3,
        };
        assert!(err.to_string().contains("leaf 3"));
    }
}
