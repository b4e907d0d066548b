//! Builder ports
//!
//! Builders turn cube and pipe specs into temporal stacks of plaquette
//! layers. Assembly only relies on the shape of their output: cubes merged
//! in the same time slice must share a slot schedule, a temporal pipe yields
//! exactly two layers, and a spatial pipe yields a block with the same
//! structure as the cubes it joins.

use sc_02_layers::{Block, PlaquetteLayer};

use crate::domain::errors::AssemblyError;
use crate::domain::specs::{CubeSpec, PipeSpec};

/// Builds the block of a cube.
pub trait CubeBuilder {
    fn build_cube(&self, spec: &CubeSpec) -> Result<Block<PlaquetteLayer>, AssemblyError>;
}

/// Builds the block of a pipe.
pub trait PipeBuilder {
    fn build_pipe(&self, spec: &PipeSpec) -> Result<Block<PlaquetteLayer>, AssemblyError>;
}
