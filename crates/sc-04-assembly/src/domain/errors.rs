//! Error types for the Assembly Subsystem

use sc_01_plaquettes::PlaquetteError;
use sc_02_layers::LayerError;
use sc_03_layer_tree::TreeError;
use thiserror::Error;

/// All errors that can occur while building, validating or compiling a block graph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    /// Cube kind string could not be parsed
    #[error("Invalid cube kind '{kind}': {reason}")]
    InvalidCubeKind { kind: String, reason: String },

    /// Two cubes were added at the same position
    #[error("A cube already exists at {position}")]
    DuplicateCube { position: String },

    /// A pipe references a position without a cube
    #[error("No cube at {position}")]
    MissingCube { position: String },

    /// A pipe joins two positions that are not neighbours
    #[error("Cannot join {u} and {v} with a pipe: they are not neighbours")]
    NotNeighbours { u: String, v: String },

    /// Two pipes join the same pair of cubes
    #[error("A pipe already joins {u} and {v}")]
    DuplicatePipe { u: String, v: String },

    /// A structural rule of the graph is violated
    #[error("Invalid block graph: {0}")]
    InvalidGraph(String),

    /// The graph still has open ports and cannot be compiled
    #[error("Cannot compile a graph with {count} open port(s)")]
    OpenPorts { count: usize },

    /// Configuration the standard builders do not implement
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Logical readout requested on a cube that is not in the last time slice
    #[error("Cannot read out cube {position}: it is not in the final time slice {final_z}")]
    ReadoutNotFinal { position: String, final_z: i64 },

    #[error(transparent)]
    Layer(#[from] LayerError),

    #[error(transparent)]
    Plaquette(#[from] PlaquetteError),

    #[error(transparent)]
    Tree(#[from] TreeError),
}
