//! Ports for the Assembly Subsystem

pub mod builders;

pub use builders::{CubeBuilder, PipeBuilder};
