//! Adapters for the Assembly Subsystem

pub mod standard;

pub use standard::{StandardCubeBuilder, StandardPipeBuilder};
