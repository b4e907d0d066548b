//! Per-scale annotations of a layer tree

use std::collections::BTreeMap;

use sc_01_plaquettes::{
    PlacedPlaquette, ScheduledCircuit, MEASUREMENT_MOMENT, RESET_MOMENT,
};
use shared_types::{Gate, GridQubit, QubitMap};

use super::detectors::Detector;
use super::node::LeafId;

/// Single-qubit operations at the two boundaries of a leaf's schedule.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LeafBoundary {
    pub resets: BTreeMap<GridQubit, Gate>,
    pub measurements: BTreeMap<GridQubit, Gate>,
}

impl LeafBoundary {
    pub fn from_circuit(circuit: &ScheduledCircuit) -> Self {
        let collect = |moment: usize| {
            circuit.moments()[moment]
                .iter()
                .filter(|operation| operation.qubits.len() == 1)
                .map(|operation| (operation.qubits[0], operation.gate))
                .collect()
        };
        Self {
            resets: collect(RESET_MOMENT),
            measurements: collect(MEASUREMENT_MOMENT),
        }
    }
}

/// Everything computed for one leaf at one scale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeafAnnotations {
    pub circuit: ScheduledCircuit,
    pub plaquettes: Vec<PlacedPlaquette>,
    pub boundary: LeafBoundary,
}

/// Position of each measured qubit in the measurement record of one leaf.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MeasurementRecord {
    order: BTreeMap<GridQubit, usize>,
}

impl MeasurementRecord {
    pub fn new(measured: &[GridQubit]) -> Self {
        Self {
            order: measured
                .iter()
                .enumerate()
                .map(|(index, qubit)| (*qubit, index))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Negative record offset of the measurement of `qubit`, when `after`
    /// measurements happened since the end of this leaf.
    pub fn lookback(&self, qubit: &GridQubit, after: usize) -> Option<i64> {
        let index = self.order.get(qubit)?;
        Some(*index as i64 - self.len() as i64 - after as i64)
    }
}

/// Detectors of a leaf executed after a given predecessor.
pub type DetectorKey = (LeafId, Option<LeafId>);

/// Annotations of the whole tree at one scale.
#[derive(Clone, Debug, Default)]
pub struct TreeAnnotations {
    pub leaves: BTreeMap<LeafId, LeafAnnotations>,
    pub qubit_map: QubitMap,
    pub records: BTreeMap<LeafId, MeasurementRecord>,
    pub detectors: BTreeMap<DetectorKey, Vec<Detector>>,
}
