//! Block graphs
//!
//! A block graph is the 3D spacetime diagram of a computation: cubes at
//! integer positions and pipes between neighbouring cubes. `z` is time.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shared_types::{Basis, Direction3D, Position3D};

use super::errors::AssemblyError;
use super::invariants::{
    invariant_matching_bases, invariant_not_all_directions, invariant_port_single_pipe,
    invariant_y_cube_single_temporal_pipe,
};

/// What occupies a node of the graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CubeKind {
    /// Memory cube. Each field is the basis of the boundaries normal to that
    /// axis; `z` is the basis the cube is initialised and measured in.
    Zx { x: Basis, y: Basis, z: Basis },
    /// Open input or output of the computation.
    Port { label: String },
    /// Half cube preparing or measuring in the Y basis.
    YHalfCube,
}

impl CubeKind {
    /// Basis of the boundaries normal to `direction`, `None` for ports and Y cubes.
    pub fn basis_along(&self, direction: Direction3D) -> Option<Basis> {
        let CubeKind::Zx { x, y, z } = self else {
            return None;
        };
        Some(match direction {
            Direction3D::X => *x,
            Direction3D::Y => *y,
            Direction3D::Z => *z,
        })
    }

    pub fn is_port(&self) -> bool {
        matches!(self, CubeKind::Port { .. })
    }

    pub fn is_y_cube(&self) -> bool {
        matches!(self, CubeKind::YHalfCube)
    }
}

impl FromStr for CubeKind {
    type Err = AssemblyError;

    /// Parses `"ZXZ"`-style kinds, `"Y"` and `"PORT"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        match upper.as_str() {
            "Y" => return Ok(CubeKind::YHalfCube),
            "PORT" | "P" => {
                return Ok(CubeKind::Port {
                    label: String::new(),
                })
            }
            _ => {}
        }
        let invalid = |reason: &str| AssemblyError::InvalidCubeKind {
            kind: s.to_string(),
            reason: reason.to_string(),
        };
        let bases = upper
            .chars()
            .map(|c| match Basis::from_char(c) {
                Some(basis @ (Basis::X | Basis::Z)) => Ok(basis),
                _ => Err(invalid("expected three characters among 'X' and 'Z'")),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let &[x, y, z] = bases.as_slice() else {
            return Err(invalid("expected three characters among 'X' and 'Z'"));
        };
        if x == y && y == z {
            return Err(invalid("the three bases cannot all be equal"));
        }
        Ok(CubeKind::Zx { x, y, z })
    }
}

impl fmt::Display for CubeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CubeKind::Zx { x, y, z } => write!(f, "{x}{y}{z}"),
            CubeKind::Port { label } if label.is_empty() => f.write_str("PORT"),
            CubeKind::Port { label } => write!(f, "PORT({label})"),
            CubeKind::YHalfCube => f.write_str("Y"),
        }
    }
}

/// A pipe between two neighbouring positions, stored with `u < v`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pipe {
    pub u: Position3D,
    pub v: Position3D,
    pub direction: Direction3D,
}

impl Pipe {
    pub fn new(u: Position3D, v: Position3D) -> Result<Self, AssemblyError> {
        let direction = Direction3D::from_neighbouring_positions(&u, &v).ok_or_else(|| {
            AssemblyError::NotNeighbours {
                u: u.to_string(),
                v: v.to_string(),
            }
        })?;
        let (u, v) = if u < v { (u, v) } else { (v, u) };
        Ok(Self { u, v, direction })
    }

    pub fn touches(&self, position: &Position3D) -> bool {
        self.u == *position || self.v == *position
    }

    pub fn is_temporal(&self) -> bool {
        !self.direction.is_spatial()
    }
}

/// Cubes and pipes of a computation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockGraph {
    name: String,
    cubes: BTreeMap<Position3D, CubeKind>,
    pipes: BTreeMap<(Position3D, Position3D), Pipe>,
}

impl BlockGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_cube(&mut self, position: Position3D, kind: CubeKind) -> Result<(), AssemblyError> {
        if self.cubes.contains_key(&position) {
            return Err(AssemblyError::DuplicateCube {
                position: position.to_string(),
            });
        }
        self.cubes.insert(position, kind);
        Ok(())
    }

    pub fn add_pipe(&mut self, u: Position3D, v: Position3D) -> Result<(), AssemblyError> {
        for position in [u, v] {
            if !self.cubes.contains_key(&position) {
                return Err(AssemblyError::MissingCube {
                    position: position.to_string(),
                });
            }
        }
        let pipe = Pipe::new(u, v)?;
        if self.pipes.contains_key(&(pipe.u, pipe.v)) {
            return Err(AssemblyError::DuplicatePipe {
                u: pipe.u.to_string(),
                v: pipe.v.to_string(),
            });
        }
        self.pipes.insert((pipe.u, pipe.v), pipe);
        Ok(())
    }

    pub fn cubes(&self) -> &BTreeMap<Position3D, CubeKind> {
        &self.cubes
    }

    pub fn cube(&self, position: &Position3D) -> Result<&CubeKind, AssemblyError> {
        self.cubes
            .get(position)
            .ok_or_else(|| AssemblyError::MissingCube {
                position: position.to_string(),
            })
    }

    pub fn pipes(&self) -> impl Iterator<Item = &Pipe> {
        self.pipes.values()
    }

    /// Pipes touching `position`.
    pub fn pipes_at<'a>(&'a self, position: &'a Position3D) -> impl Iterator<Item = &'a Pipe> {
        self.pipes.values().filter(move |pipe| pipe.touches(position))
    }

    /// True if a temporal pipe leaves `position` towards the future.
    pub fn has_pipe_above(&self, position: &Position3D) -> bool {
        self.pipes
            .contains_key(&(*position, position.shift_by(0, 0, 1)))
    }

    /// True if a temporal pipe reaches `position` from the past.
    pub fn has_pipe_below(&self, position: &Position3D) -> bool {
        self.pipes
            .contains_key(&(position.shift_by(0, 0, -1), *position))
    }

    pub fn num_ports(&self) -> usize {
        self.cubes.values().filter(|kind| kind.is_port()).count()
    }

    /// Largest `z` of any cube, `None` for an empty graph.
    pub fn max_z(&self) -> Option<i64> {
        self.cubes.keys().map(|p| p.z).max()
    }

    /// Copy translated along time so that the earliest cube sits at `z = 0`.
    pub fn shift_min_z_to_zero(&self) -> Self {
        let Some(min_z) = self.cubes.keys().map(|p| p.z).min() else {
            return self.clone();
        };
        let shift = |p: &Position3D| p.shift_by(0, 0, -min_z);
        Self {
            name: self.name.clone(),
            cubes: self
                .cubes
                .iter()
                .map(|(position, kind)| (shift(position), kind.clone()))
                .collect(),
            pipes: self
                .pipes
                .values()
                .map(|pipe| {
                    let moved = Pipe {
                        u: shift(&pipe.u),
                        v: shift(&pipe.v),
                        direction: pipe.direction,
                    };
                    ((moved.u, moved.v), moved)
                })
                .collect(),
        }
    }

    /// Check the structural rules of the graph.
    pub fn validate(&self) -> Result<(), AssemblyError> {
        for (position, kind) in &self.cubes {
            let directions: Vec<Direction3D> =
                self.pipes_at(position).map(|pipe| pipe.direction).collect();
            if !invariant_port_single_pipe(kind, directions.len()) {
                return Err(AssemblyError::InvalidGraph(format!(
                    "port at {position} must have exactly one pipe, found {}",
                    directions.len()
                )));
            }
            if kind.is_y_cube() && !invariant_y_cube_single_temporal_pipe(&directions) {
                return Err(AssemblyError::InvalidGraph(format!(
                    "Y cube at {position} must have exactly one temporal pipe"
                )));
            }
            if !invariant_not_all_directions(&directions) {
                return Err(AssemblyError::InvalidGraph(format!(
                    "cube at {position} has pipes in all three directions"
                )));
            }
        }
        for pipe in self.pipes.values() {
            let u = self.cube(&pipe.u)?;
            let v = self.cube(&pipe.v)?;
            if !invariant_matching_bases(u, v, pipe.direction) {
                return Err(AssemblyError::InvalidGraph(format!(
                    "cubes {u} at {} and {v} at {} do not match across a {} pipe",
                    pipe.u, pipe.v, pipe.direction
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(s: &str) -> CubeKind {
        s.parse().unwrap()
    }

    fn p(x: i64, y: i64, z: i64) -> Position3D {
        Position3D::new(x, y, z)
    }

    // =========================================================================
    // Cube kinds
    // =========================================================================

    #[test]
    fn test_parse_cube_kinds() {
        assert_eq!(
            kind("zxz"),
            CubeKind::Zx {
                x: Basis::Z,
                y: Basis::X,
                z: Basis::Z
            }
        );
        assert_eq!(kind("Y"), CubeKind::YHalfCube);
        assert!(kind("PORT").is_port());
        assert_eq!(kind("XZX").to_string(), "XZX");
    }

    #[test]
    fn test_invalid_cube_kinds() {
        assert!("ZZZ".parse::<CubeKind>().is_err());
        assert!("ZX".parse::<CubeKind>().is_err());
        assert!("ZYX".parse::<CubeKind>().is_err());
    }

    // =========================================================================
    // Graph construction
    // =========================================================================

    #[test]
    fn test_pipe_requires_cubes_and_neighbours() {
        let mut graph = BlockGraph::new("test");
        graph.add_cube(p(0, 0, 0), kind("ZXZ")).unwrap();
        graph.add_cube(p(0, 0, 2), kind("ZXZ")).unwrap();
        assert!(matches!(
            graph.add_pipe(p(0, 0, 0), p(0, 0, 1)),
            Err(AssemblyError::MissingCube { .. })
        ));
        assert!(matches!(
            graph.add_pipe(p(0, 0, 0), p(0, 0, 2)),
            Err(AssemblyError::NotNeighbours { .. })
        ));
        assert!(matches!(
            graph.add_cube(p(0, 0, 0), kind("XZX")),
            Err(AssemblyError::DuplicateCube { .. })
        ));
    }

    #[test]
    fn test_pipe_is_normalized() {
        let mut graph = BlockGraph::new("test");
        graph.add_cube(p(0, 0, 0), kind("ZXZ")).unwrap();
        graph.add_cube(p(0, 0, 1), kind("ZXZ")).unwrap();
        graph.add_pipe(p(0, 0, 1), p(0, 0, 0)).unwrap();
        assert!(graph.has_pipe_above(&p(0, 0, 0)));
        assert!(graph.has_pipe_below(&p(0, 0, 1)));
        assert!(matches!(
            graph.add_pipe(p(0, 0, 0), p(0, 0, 1)),
            Err(AssemblyError::DuplicatePipe { .. })
        ));
    }

    #[test]
    fn test_shift_min_z_to_zero() {
        let mut graph = BlockGraph::new("test");
        graph.add_cube(p(0, 0, -2), kind("ZXZ")).unwrap();
        graph.add_cube(p(0, 0, -1), kind("ZXZ")).unwrap();
        graph.add_pipe(p(0, 0, -2), p(0, 0, -1)).unwrap();
        let shifted = graph.shift_min_z_to_zero();
        assert!(shifted.cubes().contains_key(&p(0, 0, 0)));
        assert!(shifted.has_pipe_above(&p(0, 0, 0)));
        assert_eq!(shifted.max_z(), Some(1));
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn test_port_needs_one_pipe() {
        let mut graph = BlockGraph::new("test");
        graph.add_cube(p(0, 0, 0), kind("PORT")).unwrap();
        assert!(graph.validate().is_err());
        graph.add_cube(p(0, 0, 1), kind("ZXZ")).unwrap();
        graph.add_pipe(p(0, 0, 0), p(0, 0, 1)).unwrap();
        graph.validate().unwrap();
        assert_eq!(graph.num_ports(), 1);
    }

    #[test]
    fn test_mismatched_bases_rejected() {
        let mut graph = BlockGraph::new("test");
        graph.add_cube(p(0, 0, 0), kind("ZXZ")).unwrap();
        graph.add_cube(p(0, 0, 1), kind("XZZ")).unwrap();
        graph.add_pipe(p(0, 0, 0), p(0, 0, 1)).unwrap();
        assert!(matches!(graph.validate(), Err(AssemblyError::InvalidGraph(_))));
    }

    #[test]
    fn test_y_cube_needs_temporal_pipe() {
        let mut graph = BlockGraph::new("test");
        graph.add_cube(p(0, 0, 0), kind("Y")).unwrap();
        graph.add_cube(p(1, 0, 0), kind("ZXZ")).unwrap();
        graph.add_pipe(p(0, 0, 0), p(1, 0, 0)).unwrap();
        assert!(graph.validate().is_err());
    }
}
