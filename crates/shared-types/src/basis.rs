//! Pauli bases.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single-qubit Pauli basis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Basis {
    X,
    Y,
    Z,
}

impl Basis {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'x' => Some(Basis::X),
            'y' => Some(Basis::Y),
            'z' => Some(Basis::Z),
            _ => None,
        }
    }

    /// Lower-case character used in plaquette descriptions.
    pub fn as_char(&self) -> char {
        match self {
            Basis::X => 'x',
            Basis::Y => 'y',
            Basis::Z => 'z',
        }
    }

    /// Swap X and Z, leaving Y unchanged.
    pub fn flipped(&self) -> Self {
        match self {
            Basis::X => Basis::Z,
            Basis::Y => Basis::Y,
            Basis::Z => Basis::X,
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char().to_ascii_uppercase())
    }
}

/// A basis or a Hadamard, as used by data-qubit reset and measurement fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExtendedBasis {
    Basis(Basis),
    H,
}

impl ExtendedBasis {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'h' => Some(ExtendedBasis::H),
            other => Basis::from_char(other).map(ExtendedBasis::Basis),
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            ExtendedBasis::Basis(b) => b.as_char(),
            ExtendedBasis::H => 'h',
        }
    }

    pub fn basis(&self) -> Option<Basis> {
        match self {
            ExtendedBasis::Basis(b) => Some(*b),
            ExtendedBasis::H => None,
        }
    }
}

impl From<Basis> for ExtendedBasis {
    fn from(basis: Basis) -> Self {
        ExtendedBasis::Basis(basis)
    }
}
