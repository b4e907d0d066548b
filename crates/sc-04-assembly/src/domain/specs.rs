//! Builder inputs
//!
//! Specs carry everything a builder may need about a cube or a pipe without
//! handing it the whole graph.

use shared_types::{Direction3D, Position3D};

use super::errors::AssemblyError;
use super::graph::{BlockGraph, CubeKind, Pipe};

/// A cube and its temporal surroundings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CubeSpec {
    pub kind: CubeKind,
    /// A temporal pipe arrives from the cube below
    pub pipe_below: bool,
    /// A temporal pipe leaves towards the cube above
    pub pipe_above: bool,
}

impl CubeSpec {
    pub fn from_graph(graph: &BlockGraph, position: &Position3D) -> Result<Self, AssemblyError> {
        Ok(Self {
            kind: graph.cube(position)?.clone(),
            pipe_below: graph.has_pipe_below(position),
            pipe_above: graph.has_pipe_above(position),
        })
    }
}

/// A pipe and the two cubes it joins, `u` being the lower position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipeSpec {
    pub u: CubeSpec,
    pub v: CubeSpec,
    pub direction: Direction3D,
}

impl PipeSpec {
    pub fn from_graph(graph: &BlockGraph, pipe: &Pipe) -> Result<Self, AssemblyError> {
        Ok(Self {
            u: CubeSpec::from_graph(graph, &pipe.u)?,
            v: CubeSpec::from_graph(graph, &pipe.v)?,
            direction: pipe.direction,
        })
    }
}
