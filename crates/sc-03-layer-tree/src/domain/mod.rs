//! Domain layer for the layer tree

pub mod annotations;
pub mod detectors;
pub mod errors;
pub mod node;
pub mod observables;
