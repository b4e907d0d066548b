//! Error types for plaquettes and templates

use shared_types::QubitMapError;
use thiserror::Error;

/// All errors that can occur while describing or generating plaquettes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaquetteError {
    /// A single RPNG value could not be parsed
    #[error("Invalid RPNG value '{value}': {reason}")]
    InvalidRpng { value: String, reason: String },

    /// A plaquette description is malformed
    #[error("Invalid plaquette description '{description}': {reason}")]
    InvalidDescription { description: String, reason: String },

    /// Two corners of the same plaquette interact at the same moment
    #[error("Duplicate interaction timestep {step} in plaquette description")]
    DuplicateTimestep { step: u8 },

    /// The template has no such border
    #[error("Template {template} has no {border} border")]
    UnsupportedBorder { template: String, border: String },

    /// Two plaquettes schedule different operations on one qubit at one moment
    #[error("Conflicting operations on qubit {qubit} at moment {moment}")]
    QubitConflict { qubit: String, moment: usize },

    /// Qubit lookup failed while emitting a circuit
    #[error("Qubit map error: {0}")]
    QubitMap(#[from] QubitMapError),
}
