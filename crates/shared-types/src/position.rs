//! # Positions
//!
//! Integer block coordinates in the 2D layout and the 3D spacetime graph.

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// A position on a 2D integer grid (block or plaquette units).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position2D {
    pub x: i64,
    pub y: i64,
}

impl Position2D {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn with_z(&self, z: i64) -> Position3D {
        Position3D::new(self.x, self.y, z)
    }

    /// Manhattan distance between two positions.
    pub fn manhattan_distance(&self, other: &Self) -> u64 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Position2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add<Shift2D> for Position2D {
    type Output = Self;

    fn add(self, rhs: Shift2D) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// A position in the 3D spacetime graph. `z` is the temporal axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position3D {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl Position3D {
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    pub fn as_2d(&self) -> Position2D {
        Position2D::new(self.x, self.y)
    }

    pub fn shift_by(&self, dx: i64, dy: i64, dz: i64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// True if the two positions differ by exactly one along a single axis.
    pub fn is_neighbour(&self, other: &Self) -> bool {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) + self.z.abs_diff(other.z) == 1
    }
}

impl fmt::Display for Position3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// One of the three axes of the spacetime graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction3D {
    X,
    Y,
    Z,
}

impl Direction3D {
    pub const ALL: [Direction3D; 3] = [Direction3D::X, Direction3D::Y, Direction3D::Z];

    /// Axis joining two neighbouring positions, `None` if they are not neighbours.
    pub fn from_neighbouring_positions(u: &Position3D, v: &Position3D) -> Option<Self> {
        if !u.is_neighbour(v) {
            return None;
        }
        if u.x != v.x {
            Some(Direction3D::X)
        } else if u.y != v.y {
            Some(Direction3D::Y)
        } else {
            Some(Direction3D::Z)
        }
    }

    pub fn is_spatial(&self) -> bool {
        !matches!(self, Direction3D::Z)
    }
}

impl fmt::Display for Direction3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction3D::X => "X",
            Direction3D::Y => "Y",
            Direction3D::Z => "Z",
        };
        f.write_str(name)
    }
}

/// A 2D displacement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Shift2D {
    pub x: i64,
    pub y: i64,
}

impl Shift2D {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// A concrete 2D extent, obtained by evaluating a scalable shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape2D {
    pub x: i64,
    pub y: i64,
}

impl Shape2D {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}
