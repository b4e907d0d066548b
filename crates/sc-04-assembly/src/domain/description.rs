//! Serialized block graph descriptions
//!
//! ```json
//! {
//!   "name": "memory",
//!   "cubes": [
//!     { "position": [0, 0, 0], "kind": "ZXZ" },
//!     { "position": [0, 0, 1], "kind": "ZXZ" }
//!   ],
//!   "pipes": [{ "u": [0, 0, 0], "v": [0, 0, 1] }],
//!   "observables": [[0, 0, 1]]
//! }
//! ```

use serde::{Deserialize, Serialize};
use shared_types::Position3D;

use super::errors::AssemblyError;
use super::graph::{BlockGraph, CubeKind};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CubeDescription {
    pub position: [i64; 3],
    pub kind: String,
    /// Port label, ignored for other kinds
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipeDescription {
    pub u: [i64; 3],
    pub v: [i64; 3],
}

/// A block graph and the cubes whose logical readout forms an observable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDescription {
    #[serde(default)]
    pub name: String,
    pub cubes: Vec<CubeDescription>,
    #[serde(default)]
    pub pipes: Vec<PipeDescription>,
    #[serde(default)]
    pub observables: Vec<[i64; 3]>,
}

fn position([x, y, z]: [i64; 3]) -> Position3D {
    Position3D::new(x, y, z)
}

impl GraphDescription {
    pub fn to_graph(&self) -> Result<BlockGraph, AssemblyError> {
        let mut graph = BlockGraph::new(self.name.clone());
        for cube in &self.cubes {
            let mut kind: CubeKind = cube.kind.parse()?;
            if let (CubeKind::Port { label }, Some(given)) = (&mut kind, &cube.label) {
                label.clone_from(given);
            }
            graph.add_cube(position(cube.position), kind)?;
        }
        for pipe in &self.pipes {
            graph.add_pipe(position(pipe.u), position(pipe.v))?;
        }
        Ok(graph)
    }

    pub fn observable_positions(&self) -> Vec<Position3D> {
        self.observables.iter().copied().map(position).collect()
    }
}
