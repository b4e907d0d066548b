//! # SC-01: Plaquettes Subsystem
//!
//! Local operation patterns ("plaquettes") and the rectangular templates that
//! tile them over a 2D layout.
//!
//! ## Architecture
//!
//! - **Domain**: RPNG plaquette descriptions, plaquette collections, templates
//!   with their border indices
//! - **Algorithms**: placement of plaquettes on the global grid and generation
//!   of the scheduled circuit of one layer
//! - **Library**: CSS memory plaquettes for cubes and pipes
//!
//! ## Coordinates
//!
//! A plaquette at plaquette position `(x, y)` owns the syndrome qubit
//! `(2x + 1, 2y + 1)` and touches the data qubits at its four corners
//! `(2x, 2y)`, `(2x + 2, 2y)`, `(2x, 2y + 2)` and `(2x + 2, 2y + 2)`.
//! `y` grows downwards: the top border of a template is its row `0`.

pub mod algorithms;
pub mod domain;
pub mod library;

pub use algorithms::generation::{
    generate_circuit, place_plaquettes, Operation, PlacedPlaquette, ScheduledCircuit,
};
pub use domain::errors::PlaquetteError;
pub use domain::plaquettes::Plaquettes;
pub use domain::rpng::{
    AncillaBases, Rpng, RpngDescription, MEASUREMENT_MOMENT, RESET_MOMENT, SCHEDULE_LENGTH,
};
pub use domain::template::{BorderIndices, Template, TemplateBorder};
