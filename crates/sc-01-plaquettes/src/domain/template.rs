//! Rectangular templates
//!
//! A template is a scalable 2D grid of plaquette indices. The closed set of
//! templates covers one cube (`Qubit`) and the two kinds of spatial pipe
//! (`VerticalBorders` between X-neighbours, `HorizontalBorders` between
//! Y-neighbours). Index layouts use `n = 2k + 2` plaquettes per scalable side.
//!
//! ```text
//!  Qubit                VerticalBorders   HorizontalBorders
//!  1  5  6  5  6  2     1  2              1  3  4  3  4  2
//!  7  9 10  9 10 11     3  4              5  7  8  7  8  6
//!  8 10  9 10  9 12     5  6
//!  7  9 10  9 10 11     3  4
//!  8 10  9 10  9 12     5  6
//!  3 13 14 13 14  4     7  8
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use shared_types::{LinearFunction, Scalable2D, Shape2D};

use super::errors::PlaquetteError;

/// One side of a rectangular template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TemplateBorder {
    Top,
    Bottom,
    Left,
    Right,
}

impl TemplateBorder {
    pub fn opposite(&self) -> Self {
        match self {
            TemplateBorder::Top => TemplateBorder::Bottom,
            TemplateBorder::Bottom => TemplateBorder::Top,
            TemplateBorder::Left => TemplateBorder::Right,
            TemplateBorder::Right => TemplateBorder::Left,
        }
    }
}

impl fmt::Display for TemplateBorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TemplateBorder::Top => "top",
            TemplateBorder::Bottom => "bottom",
            TemplateBorder::Left => "left",
            TemplateBorder::Right => "right",
        };
        f.write_str(name)
    }
}

/// Plaquette indices found along one border, in border order.
///
/// `side_odd` and `side_even` alternate along the border between the two
/// corners, keyed by the parity of the coordinate along the border.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BorderIndices {
    pub first_corner: usize,
    pub side_odd: usize,
    pub side_even: usize,
    pub last_corner: usize,
}

impl BorderIndices {
    pub const fn new(first_corner: usize, side_odd: usize, side_even: usize, last_corner: usize) -> Self {
        Self {
            first_corner,
            side_odd,
            side_even,
            last_corner,
        }
    }

    pub fn indices(&self) -> [usize; 4] {
        [self.first_corner, self.side_odd, self.side_even, self.last_corner]
    }

    /// Positional correspondence between the indices of `self` and `other`.
    pub fn to(&self, other: &BorderIndices) -> BTreeMap<usize, usize> {
        self.indices().into_iter().zip(other.indices()).collect()
    }
}

/// The closed set of templates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Template {
    /// `n x n` plaquettes covering one cube.
    Qubit,
    /// `2 x n` plaquettes straddling two X-neighbouring cubes.
    VerticalBorders,
    /// `n x 2` plaquettes straddling two Y-neighbouring cubes.
    HorizontalBorders,
}

const SCALABLE_SIDE: LinearFunction = LinearFunction::new(2, 2);
const FIXED_SIDE: LinearFunction = LinearFunction::constant(2);

impl Template {
    pub fn name(&self) -> &'static str {
        match self {
            Template::Qubit => "Qubit",
            Template::VerticalBorders => "VerticalBorders",
            Template::HorizontalBorders => "HorizontalBorders",
        }
    }

    /// Shape in plaquettes.
    pub fn scalable_shape(&self) -> Scalable2D {
        match self {
            Template::Qubit => Scalable2D::new(SCALABLE_SIDE, SCALABLE_SIDE),
            Template::VerticalBorders => Scalable2D::new(FIXED_SIDE, SCALABLE_SIDE),
            Template::HorizontalBorders => Scalable2D::new(SCALABLE_SIDE, FIXED_SIDE),
        }
    }

    pub fn shape(&self, k: u32) -> Shape2D {
        self.scalable_shape().to_shape_2d(k)
    }

    /// Largest plaquette index used by the template.
    pub fn expected_plaquettes_number(&self) -> usize {
        match self {
            Template::Qubit => 14,
            Template::VerticalBorders | Template::HorizontalBorders => 8,
        }
    }

    /// Index grid for the given scale, as `rows[y][x]`.
    pub fn instantiate(&self, k: u32) -> Vec<Vec<usize>> {
        let shape = self.shape(k);
        let (width, height) = (shape.x, shape.y);
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| self.index_at(x, y, width, height))
                    .collect()
            })
            .collect()
    }

    fn index_at(&self, x: i64, y: i64, width: i64, height: i64) -> usize {
        let pick = |coordinate: i64, odd: usize, even: usize| {
            if coordinate % 2 == 1 {
                odd
            } else {
                even
            }
        };
        let (last_x, last_y) = (width - 1, height - 1);
        match self {
            Template::Qubit => match (x, y) {
                (0, 0) => 1,
                (x, 0) if x == last_x => 2,
                (0, y) if y == last_y => 3,
                (x, y) if x == last_x && y == last_y => 4,
                (x, 0) => pick(x, 5, 6),
                (x, y) if y == last_y => pick(x, 13, 14),
                (0, y) => pick(y, 7, 8),
                (x, y) if x == last_x => pick(y, 11, 12),
                (x, y) => pick(x + y + 1, 9, 10),
            },
            Template::VerticalBorders => {
                let row = if y == 0 {
                    [1, 2]
                } else if y == last_y {
                    [7, 8]
                } else {
                    [pick(y, 3, 5), pick(y, 4, 6)]
                };
                row[usize::from(x != 0)]
            }
            Template::HorizontalBorders => {
                let (first, last, odd, even) = if y == 0 { (1, 2, 3, 4) } else { (5, 6, 7, 8) };
                if x == 0 {
                    first
                } else if x == last_x {
                    last
                } else {
                    pick(x, odd, even)
                }
            }
        }
    }

    /// Indices found along the given border.
    pub fn border_indices(&self, border: TemplateBorder) -> Result<BorderIndices, PlaquetteError> {
        let indices = match (self, border) {
            (Template::Qubit, TemplateBorder::Top) => BorderIndices::new(1, 5, 6, 2),
            (Template::Qubit, TemplateBorder::Bottom) => BorderIndices::new(3, 13, 14, 4),
            (Template::Qubit, TemplateBorder::Left) => BorderIndices::new(1, 7, 8, 3),
            (Template::Qubit, TemplateBorder::Right) => BorderIndices::new(2, 11, 12, 4),
            (Template::VerticalBorders, TemplateBorder::Left) => BorderIndices::new(1, 3, 5, 7),
            (Template::VerticalBorders, TemplateBorder::Right) => BorderIndices::new(2, 4, 6, 8),
            (Template::HorizontalBorders, TemplateBorder::Top) => BorderIndices::new(1, 3, 4, 2),
            (Template::HorizontalBorders, TemplateBorder::Bottom) => BorderIndices::new(5, 7, 8, 6),
            _ => {
                return Err(PlaquetteError::UnsupportedBorder {
                    template: self.name().to_string(),
                    border: border.to_string(),
                })
            }
        };
        Ok(indices)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
