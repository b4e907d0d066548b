//! Layout positions and merged layout layers
//!
//! Cube and pipe positions share one integer space by doubling coordinates:
//! a cube at block `(x, y)` sits at `(2x, 2y)` and the pipe between two
//! neighbouring cubes at the sum of their block coordinates, which is odd
//! along the pipe axis. The doubled form only defines the ordering; the
//! public constructors take block coordinates.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use sc_01_plaquettes::{
    place_plaquettes, PlacedPlaquette, ScheduledCircuit, Template, TemplateBorder,
};
use serde::{Deserialize, Serialize};
use shared_types::{LinearFunction, Position2D, Scalable2D};

use super::atomic::{AtomicLayer, PlaquetteLayer};
use super::errors::LayerError;

/// Position of a cube or of a pipe in the 2D layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutPosition {
    Cube { position: Position2D },
    /// Pipe between `u` and `v`, with `u < v`.
    Pipe { u: Position2D, v: Position2D },
}

impl LayoutPosition {
    pub fn cube(position: Position2D) -> Self {
        LayoutPosition::Cube { position }
    }

    /// Pipe between two cubes that must be spatial neighbours.
    pub fn pipe(u: Position2D, v: Position2D) -> Result<Self, LayerError> {
        if u.manhattan_distance(&v) != 1 {
            return Err(LayerError::Configuration(format!(
                "cannot place a pipe between {u} and {v}: they are not neighbours"
            )));
        }
        let (u, v) = if u < v { (u, v) } else { (v, u) };
        Ok(LayoutPosition::Pipe { u, v })
    }

    fn doubled(&self) -> (i64, i64) {
        match self {
            LayoutPosition::Cube { position } => (2 * position.x, 2 * position.y),
            LayoutPosition::Pipe { u, v } => (u.x + v.x, u.y + v.y),
        }
    }

    /// Top-left plaquette of the position, with cubes spanning `cube_side`
    /// plaquettes per side.
    ///
    /// A pipe covers the last plaquette column (or row) of its first cube and
    /// the first of its second cube.
    pub fn plaquette_origin(&self, cube_side: i64) -> Position2D {
        match self {
            LayoutPosition::Cube { position } => {
                Position2D::new(position.x * cube_side, position.y * cube_side)
            }
            LayoutPosition::Pipe { u, v } if u.x != v.x => {
                Position2D::new(u.x * cube_side + cube_side - 1, u.y * cube_side)
            }
            LayoutPosition::Pipe { u, .. } => {
                Position2D::new(u.x * cube_side, u.y * cube_side + cube_side - 1)
            }
        }
    }

    /// Block coordinates of the cube, `None` for a pipe.
    pub fn as_cube(&self) -> Option<Position2D> {
        match self {
            LayoutPosition::Cube { position } => Some(*position),
            LayoutPosition::Pipe { .. } => None,
        }
    }
}

impl Ord for LayoutPosition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.doubled().cmp(&other.doubled())
    }
}

impl PartialOrd for LayoutPosition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for LayoutPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutPosition::Cube { position } => write!(f, "cube {position}"),
            LayoutPosition::Pipe { u, v } => write!(f, "pipe {u} -> {v}"),
        }
    }
}

/// Atomic layers of several positions captured at the same timestep.
///
/// Only the merge engine builds layout layers.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutLayer<A> {
    layers: BTreeMap<LayoutPosition, A>,
    element_shape: Scalable2D,
}

impl<A: AtomicLayer> LayoutLayer<A> {
    pub(crate) fn new(layers: BTreeMap<LayoutPosition, A>) -> Result<Self, LayerError> {
        let Some(first) = layers.values().next() else {
            return Err(LayerError::Internal(
                "a layout layer must contain at least one layer".to_string(),
            ));
        };
        let element_shape = first.scalable_shape();
        Ok(Self {
            layers,
            element_shape,
        })
    }

    pub fn layers(&self) -> &BTreeMap<LayoutPosition, A> {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Number of cube positions spanned along each axis.
    fn block_extent(&self) -> (i64, i64) {
        let cubes: Vec<Position2D> = self
            .layers
            .keys()
            .filter_map(LayoutPosition::as_cube)
            .collect();
        let extent = |coordinate: fn(&Position2D) -> i64| {
            let min = cubes.iter().map(coordinate).min().unwrap_or(0);
            let max = cubes.iter().map(coordinate).max().unwrap_or(0);
            max - min + 1
        };
        (extent(|p: &Position2D| p.x), extent(|p: &Position2D| p.y))
    }
}

impl<A: AtomicLayer> AtomicLayer for LayoutLayer<A> {
    /// Neighbouring elements share their outer row or column of qubits.
    fn scalable_shape(&self) -> Scalable2D {
        let (nx, ny) = self.block_extent();
        let side = |element: LinearFunction, blocks: i64| (element - 1) * blocks + 1;
        Scalable2D::new(
            side(self.element_shape.x, nx),
            side(self.element_shape.y, ny),
        )
    }

    fn with_spatial_borders_trimmed(
        &self,
        _borders: &[TemplateBorder],
    ) -> Result<Self, LayerError> {
        Err(LayerError::Configuration(
            "a merged layout layer cannot be trimmed spatially".to_string(),
        ))
    }
}

impl LayoutLayer<PlaquetteLayer> {
    /// Every non-empty plaquette of the layer at its global plaquette position.
    pub fn placed_plaquettes(&self, k: u32) -> Vec<PlacedPlaquette> {
        let cube_side = Template::Qubit.shape(k).x;
        self.layers
            .iter()
            .flat_map(|(position, layer)| {
                place_plaquettes(
                    layer.template(),
                    k,
                    layer.plaquettes(),
                    position.plaquette_origin(cube_side),
                )
            })
            .collect()
    }

    /// Scheduled circuit of the whole layer on global grid qubits.
    pub fn scheduled_circuit(&self, k: u32) -> Result<ScheduledCircuit, LayerError> {
        Ok(ScheduledCircuit::from_plaquettes(&self.placed_plaquettes(k))?)
    }
}
