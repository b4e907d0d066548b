//! # Qubits
//!
//! Physical qubits live on an integer grid. Data qubits sit on even
//! coordinates, syndrome qubits at the centre of each plaquette (odd
//! coordinates). A [`QubitMap`] assigns every qubit a stable index.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::circuit::{Circuit, Instruction};
use crate::errors::QubitMapError;
use crate::position::Shift2D;

/// A physical qubit, ordered by `(x, y)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridQubit {
    pub x: i64,
    pub y: i64,
}

impl GridQubit {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GridQubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add<Shift2D> for GridQubit {
    type Output = Self;

    fn add(self, rhs: Shift2D) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Bijection between qubit indices and grid qubits.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QubitMap {
    qubits: Vec<GridQubit>,
    indices: BTreeMap<GridQubit, usize>,
}

impl QubitMap {
    /// Assign indices `0..n` to the provided qubits, in iteration order.
    pub fn from_qubits<I>(qubits: I) -> Result<Self, QubitMapError>
    where
        I: IntoIterator<Item = GridQubit>,
    {
        let mut map = Self::default();
        for qubit in qubits {
            if map.indices.contains_key(&qubit) {
                return Err(QubitMapError::DuplicateQubit {
                    qubit: qubit.to_string(),
                });
            }
            map.indices.insert(qubit, map.qubits.len());
            map.qubits.push(qubit);
        }
        Ok(map)
    }

    pub fn len(&self) -> usize {
        self.qubits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.qubits.is_empty()
    }

    pub fn index_of(&self, qubit: &GridQubit) -> Result<usize, QubitMapError> {
        self.indices
            .get(qubit)
            .copied()
            .ok_or_else(|| QubitMapError::UnknownQubit {
                qubit: qubit.to_string(),
            })
    }

    pub fn qubit(&self, index: usize) -> Option<GridQubit> {
        self.qubits.get(index).copied()
    }

    /// Qubits sorted by index.
    pub fn qubits(&self) -> &[GridQubit] {
        &self.qubits
    }

    /// One `QUBIT_COORDS` declaration per qubit, sorted by index.
    pub fn to_circuit(&self) -> Circuit {
        let mut circuit = Circuit::new();
        for (index, qubit) in self.qubits.iter().enumerate() {
            circuit.push(Instruction::QubitCoords {
                qubit: index,
                coords: [qubit.x, qubit.y],
            });
        }
        circuit
    }
}
