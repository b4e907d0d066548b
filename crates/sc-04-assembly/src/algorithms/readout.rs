//! Logical readout of a cube
//!
//! A cube measured in basis `z` reads out the logical operator joining its
//! two boundaries of basis `z`: a row of data qubits when those boundaries
//! are normal to X, a column when they are normal to Y.

use sc_03_layer_tree::{AbstractObservable, ScalableLine};
use shared_types::{LinearFunction, Position3D, Shift2D};

use crate::domain::errors::AssemblyError;
use crate::domain::graph::{BlockGraph, CubeKind};

/// Observable made of the final data measurements of the cube at `position`.
///
/// The cube must belong to the last time slice of `graph`.
pub fn logical_readout(
    graph: &BlockGraph,
    position: &Position3D,
) -> Result<AbstractObservable, AssemblyError> {
    let kind = graph.cube(position)?;
    let CubeKind::Zx { x, z, .. } = kind else {
        return Err(AssemblyError::Unsupported(format!(
            "logical readout of a {kind} cube"
        )));
    };
    let final_z = graph.max_z().unwrap_or(position.z);
    if position.z != final_z {
        return Err(AssemblyError::ReadoutNotFinal {
            position: position.to_string(),
            final_z,
        });
    }

    // First data qubit of the cube: plaquette origin (2k + 2) * b, doubled, plus 2.
    let first = |block: i64| LinearFunction::new(4 * block, 4 * block + 2);
    let step = if x == z {
        Shift2D::new(2, 0)
    } else {
        Shift2D::new(0, 2)
    };
    Ok(AbstractObservable {
        name: format!("{kind} readout at {position}"),
        lines: vec![ScalableLine {
            start_x: first(position.x),
            start_y: first(position.y),
            step,
            length: LinearFunction::new(2, 1),
        }],
    })
}
