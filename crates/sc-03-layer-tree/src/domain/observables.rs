//! Logical observables
//!
//! An observable is read out from the data measurements of the last executed
//! leaf. Its qubits are given as straight lines whose start and length scale
//! with `k`.

use serde::{Deserialize, Serialize};
use shared_types::{GridQubit, LinearFunction, Shift2D};

/// `length` qubits starting at `(start_x, start_y)`, each `step` apart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalableLine {
    pub start_x: LinearFunction,
    pub start_y: LinearFunction,
    pub step: Shift2D,
    pub length: LinearFunction,
}

impl ScalableLine {
    pub fn qubits(&self, k: u32) -> Vec<GridQubit> {
        let start = GridQubit::new(self.start_x.eval(k), self.start_y.eval(k));
        let length = self.length.eval(k).max(0);
        (0..length)
            .map(|i| start + Shift2D::new(i * self.step.x, i * self.step.y))
            .collect()
    }
}

/// Named set of qubit lines whose final measurements form one logical observable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbstractObservable {
    pub name: String,
    pub lines: Vec<ScalableLine>,
}

impl AbstractObservable {
    pub fn qubits(&self, k: u32) -> Vec<GridQubit> {
        self.lines.iter().flat_map(|line| line.qubits(k)).collect()
    }
}
