//! # SC-04: Assembly Subsystem
//!
//! Compiles a block graph (cubes and pipes in spacetime) into a layer tree.
//!
//! ## Architecture
//!
//! - **Domain**: [`BlockGraph`] and its validation rules, builder specs and
//!   the serialized [`GraphDescription`]
//! - **Ports**: [`CubeBuilder`] and [`PipeBuilder`]
//! - **Adapters**: the standard CSS memory builders
//! - **Algorithms**: topological assembly of pipes into cube blocks, logical
//!   readout of a cube
//! - **Application**: [`compile_block_graph`]
//!
//! ## Processing Order
//!
//! Temporal pipes are folded before spatial pipes. The standard spatial pipe
//! builder refuses to join two cubes that disagree on their temporal pipes,
//! so the cases where this order would matter are rejected.

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use adapters::standard::{StandardCubeBuilder, StandardPipeBuilder};
pub use algorithms::assembly::assemble_blocks;
pub use algorithms::readout::logical_readout;
pub use application::compile::compile_block_graph;
pub use config::StandardBuilderConfig;
pub use domain::description::{CubeDescription, GraphDescription, PipeDescription};
pub use domain::errors::AssemblyError;
pub use domain::graph::{BlockGraph, CubeKind, Pipe};
pub use domain::specs::{CubeSpec, PipeSpec};
pub use ports::builders::{CubeBuilder, PipeBuilder};
