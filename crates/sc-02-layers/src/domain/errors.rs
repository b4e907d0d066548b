//! Error types for the layer model and the merge engine

use sc_01_plaquettes::PlaquetteError;
use shared_types::ScaleError;
use thiserror::Error;

/// All errors that can occur while building, trimming or merging layers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayerError {
    /// Malformed layer: empty composition, or a repetition whose total
    /// timestep count would not be linear in `k`.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Positions being merged do not share the same temporal footprint.
    #[error("Incompatible schedules: {0}")]
    IncompatibleSchedule(String),

    /// Merge case that is explicitly not implemented.
    #[error("Unsupported merge: {0}")]
    UnsupportedMerge(String),

    /// Invariant violation that an earlier check should have prevented.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Plaquette or template error raised by an atomic layer.
    #[error(transparent)]
    Plaquette(#[from] PlaquetteError),
}

impl From<ScaleError> for LayerError {
    fn from(err: ScaleError) -> Self {
        LayerError::Configuration(err.to_string())
    }
}
