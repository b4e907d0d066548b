//! Structural invariants of block graphs

use shared_types::Direction3D;

use super::graph::CubeKind;

/// INVARIANT-1: Single Port Pipe
/// A port is connected to the rest of the computation by exactly one pipe.
pub fn invariant_port_single_pipe(kind: &CubeKind, pipe_count: usize) -> bool {
    !kind.is_port() || pipe_count == 1
}

/// INVARIANT-2: Temporal Y Cubes
/// A Y half cube has exactly one pipe, and that pipe is temporal.
pub fn invariant_y_cube_single_temporal_pipe(directions: &[Direction3D]) -> bool {
    matches!(directions, [Direction3D::Z])
}

/// INVARIANT-3: No Full Junction
/// A cube cannot have pipes along all three axes.
pub fn invariant_not_all_directions(directions: &[Direction3D]) -> bool {
    !Direction3D::ALL
        .iter()
        .all(|direction| directions.contains(direction))
}

/// INVARIANT-4: Matching Boundaries
/// Across a pipe, both cubes have the same boundary bases on the two axes
/// orthogonal to the pipe. Ports and Y cubes match anything.
pub fn invariant_matching_bases(u: &CubeKind, v: &CubeKind, direction: Direction3D) -> bool {
    Direction3D::ALL
        .iter()
        .filter(|axis| **axis != direction)
        .all(|axis| match (u.basis_along(*axis), v.basis_along(*axis)) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        })
}
