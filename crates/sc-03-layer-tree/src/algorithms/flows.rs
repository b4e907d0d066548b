//! Flow-based detector computation
//!
//! A plaquette with stabilizer basis `b` measures the `b` parity of the data
//! corners it interacts with. That parity is:
//!
//! - deterministic when every corner is reset in `b` in the same leaf
//!   (creation detector),
//! - equal to the product of outgoing flows of the previous leaf when the
//!   unreset corners are exactly covered by them (incoming flow),
//! - equal to the parity of the data measurements in `b` when every corner
//!   is measured in the same leaf (destruction detector).
//!
//! Everything is computed on a [`LocalPattern`]: the plaquette under study
//! and the previous-leaf plaquettes within the configured Manhattan radius,
//! expressed relative to the studied plaquette. Detectors are therefore
//! translation invariant and can be cached by pattern.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use shared_types::{Basis, Gate, Shift2D};
use tracing::warn;

use crate::domain::detectors::{LeafSide, RelativeDetector};

/// Offsets of the four corners from the syndrome qubit, in corner order.
const CORNER_SHIFTS: [Shift2D; 4] = [
    Shift2D::new(-1, -1),
    Shift2D::new(1, -1),
    Shift2D::new(-1, 1),
    Shift2D::new(1, 1),
];

/// Boundary operations on one data corner, as seen by one plaquette.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CornerBoundary {
    pub interacts: bool,
    pub reset: Option<Gate>,
    pub measurement: Option<Gate>,
}

/// A plaquette reduced to what matters for detector computation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaquetteBoundary {
    pub basis: Option<Basis>,
    pub corners: [CornerBoundary; 4],
}

/// Neighbourhood of one plaquette across a leaf boundary.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalPattern {
    pub centre: PlaquetteBoundary,
    /// Previous-leaf plaquettes, keyed by their offset in plaquettes.
    pub previous: Vec<(Shift2D, PlaquetteBoundary)>,
}

fn reset_basis(gate: Gate) -> Option<Basis> {
    match gate {
        Gate::R => Some(Basis::Z),
        Gate::RX => Some(Basis::X),
        Gate::RY => Some(Basis::Y),
        _ => None,
    }
}

fn measurement_basis(gate: Gate) -> Option<Basis> {
    match gate {
        Gate::M => Some(Basis::Z),
        Gate::MX => Some(Basis::X),
        Gate::MY => Some(Basis::Y),
        _ => None,
    }
}

type Support = BTreeSet<Shift2D>;
type Records = BTreeSet<(LeafSide, Shift2D)>;

/// Stabilizer parity leaving the previous leaf: the `support` data qubits
/// carry the parity given by the `records` measurements.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Flow {
    support: Support,
    records: Records,
}

fn symmetric_difference<T: Ord + Copy>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> BTreeSet<T> {
    a.symmetric_difference(b).copied().collect()
}

fn offset(base: Shift2D, shift: Shift2D) -> Shift2D {
    Shift2D::new(base.x + shift.x, base.y + shift.y)
}

/// Outgoing flow of a previous-leaf plaquette whose syndrome qubit sits at
/// `ancilla` relative to the studied plaquette.
fn outgoing_flow(plaquette: &PlaquetteBoundary, ancilla: Shift2D, basis: Basis) -> Option<Flow> {
    let mut support = Support::new();
    let mut records = Records::from([(LeafSide::Previous, ancilla)]);
    for (corner, shift) in plaquette.corners.iter().zip(CORNER_SHIFTS) {
        if !corner.interacts {
            continue;
        }
        let qubit = offset(ancilla, shift);
        match corner.measurement {
            None => {
                support.insert(qubit);
            }
            Some(gate) if measurement_basis(gate) == Some(basis) => {
                records.insert((LeafSide::Previous, qubit));
            }
            Some(_) => return None,
        }
    }
    (!support.is_empty()).then_some(Flow { support, records })
}

type EchelonRows = BTreeMap<Shift2D, (Support, BTreeSet<usize>)>;

/// Reduce `vector` against rows pivoting on their smallest element, scanning
/// its elements in ascending order.
fn reduce(
    rows: &EchelonRows,
    mut vector: Support,
    mut combination: BTreeSet<usize>,
) -> (Support, BTreeSet<usize>) {
    let mut floor: Option<Shift2D> = None;
    while let Some(pivot) = vector
        .iter()
        .find(|q| floor.map_or(true, |f| **q > f) && rows.contains_key(q))
        .copied()
    {
        if let Some((row, row_combination)) = rows.get(&pivot) {
            vector = symmetric_difference(&vector, row);
            combination = symmetric_difference(&combination, row_combination);
        }
        floor = Some(pivot);
    }
    (vector, combination)
}

/// Subset of `flows` whose supports add up to `target` over GF(2).
///
/// A single flow matching exactly is preferred. Otherwise the flows are put
/// in echelon form, each row pivoting on its smallest qubit.
fn solve(flows: &[Flow], target: &Support) -> Option<BTreeSet<usize>> {
    if let Some(index) = flows.iter().position(|flow| flow.support == *target) {
        return Some(BTreeSet::from([index]));
    }

    let mut rows = EchelonRows::new();
    for (index, flow) in flows.iter().enumerate() {
        let (vector, combination) =
            reduce(&rows, flow.support.clone(), BTreeSet::from([index]));
        if let Some(pivot) = vector.first().copied() {
            rows.insert(pivot, (vector, combination));
        }
    }
    let (remainder, combination) = reduce(&rows, target.clone(), BTreeSet::new());
    remainder.is_empty().then_some(combination)
}

/// Detectors of the centre plaquette of `pattern`, relative to its syndrome qubit.
pub fn compute_detectors(pattern: &LocalPattern) -> Vec<RelativeDetector> {
    let centre = &pattern.centre;
    let Some(basis) = centre.basis else {
        return Vec::new();
    };
    let ancilla = Shift2D::new(0, 0);
    let used: Vec<(Shift2D, &CornerBoundary)> = CORNER_SHIFTS
        .iter()
        .copied()
        .zip(centre.corners.iter())
        .filter(|(_, corner)| corner.interacts)
        .collect();

    let mut detectors = Vec::new();
    let reset_elsewhere = used
        .iter()
        .any(|(_, corner)| corner.reset.is_some_and(|gate| reset_basis(gate) != Some(basis)));
    if !reset_elsewhere {
        let needed: Support = used
            .iter()
            .filter(|(_, corner)| corner.reset.is_none())
            .map(|(shift, _)| *shift)
            .collect();
        if let Some(records) = incoming_records(pattern, basis, &needed) {
            let measurements =
                symmetric_difference(&Records::from([(LeafSide::Current, ancilla)]), &records);
            detectors.push(RelativeDetector { measurements });
        }
    }

    let all_measured = !used.is_empty()
        && used.iter().all(|(_, corner)| {
            corner
                .measurement
                .is_some_and(|gate| measurement_basis(gate) == Some(basis))
        });
    if all_measured {
        let mut measurements = Records::from([(LeafSide::Current, ancilla)]);
        measurements.extend(used.iter().map(|(shift, _)| (LeafSide::Current, *shift)));
        detectors.push(RelativeDetector { measurements });
    }
    detectors
}

/// Previous-leaf records carrying the `basis` parity of `needed`, `None` if
/// no combination of outgoing flows covers it.
fn incoming_records(pattern: &LocalPattern, basis: Basis, needed: &Support) -> Option<Records> {
    if needed.is_empty() {
        return Some(Records::new());
    }
    if pattern.previous.is_empty() {
        return None;
    }
    let flows: Vec<Flow> = pattern
        .previous
        .iter()
        .filter(|(_, plaquette)| plaquette.basis == Some(basis))
        .filter_map(|(shift, plaquette)| {
            outgoing_flow(plaquette, Shift2D::new(2 * shift.x, 2 * shift.y), basis)
        })
        .collect();
    let Some(combination) = solve(&flows, needed) else {
        warn!(
            basis = %basis,
            needed = needed.len(),
            candidates = flows.len(),
            "No combination of previous flows matches a plaquette; detector skipped"
        );
        return None;
    };
    Some(
        combination
            .iter()
            .fold(Records::new(), |records, index| {
                symmetric_difference(&records, &flows[*index].records)
            }),
    )
}
