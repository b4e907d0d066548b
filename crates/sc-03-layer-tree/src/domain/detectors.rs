//! Detectors
//!
//! A detector is a set of measurements whose parity is deterministic in the
//! absence of errors. Measurements are referenced by the qubit that produced
//! them and by the leaf they belong to, relative to the leaf the detector is
//! attached to.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use shared_types::{GridQubit, Shift2D};

/// Leaf a measurement belongs to, relative to the annotated leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LeafSide {
    Previous,
    Current,
}

/// The measurement of `qubit` in the leaf designated by `side`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeasurementRef {
    pub side: LeafSide,
    pub qubit: GridQubit,
}

/// A detector attached to a leaf, with absolute qubit coordinates.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Detector {
    /// Spatial coordinates of the detector (those of the plaquette ancilla).
    pub coordinates: GridQubit,
    pub measurements: BTreeSet<MeasurementRef>,
}

/// A detector expressed relative to the ancilla of the plaquette it was
/// computed for. This is the form stored in the detector database.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelativeDetector {
    pub measurements: BTreeSet<(LeafSide, Shift2D)>,
}

impl RelativeDetector {
    /// Absolute detector for a plaquette whose ancilla is `origin`.
    pub fn at(&self, origin: GridQubit) -> Detector {
        Detector {
            coordinates: origin,
            measurements: self
                .measurements
                .iter()
                .map(|(side, shift)| MeasurementRef {
                    side: *side,
                    qubit: origin + *shift,
                })
                .collect(),
        }
    }
}
