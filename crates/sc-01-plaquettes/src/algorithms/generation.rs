//! Circuit generation for one layer of plaquettes
//!
//! Plaquettes are first placed on the global plaquette grid, then each placed
//! plaquette contributes its operations to a fixed seven-moment schedule:
//! resets at moment 0, controlled operations at their RPNG moments and
//! measurements at moment 6. Neighbouring plaquettes share data corners, so
//! identical operations on the same qubit and moment are emitted once.

use std::collections::{BTreeMap, BTreeSet};

use shared_types::{
    Basis, Circuit, ExtendedBasis, Gate, GridQubit, Instruction, Position2D, QubitMap,
    QubitMapError,
};
use tracing::debug;

use crate::domain::errors::PlaquetteError;
use crate::domain::plaquettes::Plaquettes;
use crate::domain::rpng::{RpngDescription, MEASUREMENT_MOMENT, RESET_MOMENT, SCHEDULE_LENGTH};
use crate::domain::template::Template;

/// A plaquette description at a global plaquette position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlacedPlaquette {
    pub position: Position2D,
    pub description: RpngDescription,
}

impl PlacedPlaquette {
    /// Syndrome qubit at the centre of the plaquette.
    pub fn ancilla(&self) -> GridQubit {
        GridQubit::new(2 * self.position.x + 1, 2 * self.position.y + 1)
    }

    /// Data qubits in corner order: top-left, top-right, bottom-left, bottom-right.
    pub fn corner_qubits(&self) -> [GridQubit; 4] {
        let (x, y) = (2 * self.position.x, 2 * self.position.y);
        [
            GridQubit::new(x, y),
            GridQubit::new(x + 2, y),
            GridQubit::new(x, y + 2),
            GridQubit::new(x + 2, y + 2),
        ]
    }
}

/// Place the non-empty plaquettes of `template` with its top-left plaquette at `origin`.
pub fn place_plaquettes(
    template: Template,
    k: u32,
    plaquettes: &Plaquettes,
    origin: Position2D,
) -> Vec<PlacedPlaquette> {
    let mut placed = Vec::new();
    for (y, row) in template.instantiate(k).iter().enumerate() {
        for (x, index) in row.iter().enumerate() {
            let Some(description) = plaquettes.get(*index) else {
                continue;
            };
            placed.push(PlacedPlaquette {
                position: Position2D::new(origin.x + x as i64, origin.y + y as i64),
                description: *description,
            });
        }
    }
    placed
}

/// One gate applied to one or two qubits.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Operation {
    pub gate: Gate,
    pub qubits: Vec<GridQubit>,
}

impl Operation {
    fn single(gate: Gate, qubit: GridQubit) -> Self {
        Self {
            gate,
            qubits: vec![qubit],
        }
    }
}

/// Operations of one layer, grouped by moment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduledCircuit {
    moments: Vec<Vec<Operation>>,
    occupancy: Vec<BTreeMap<GridQubit, usize>>,
}

impl Default for ScheduledCircuit {
    fn default() -> Self {
        Self {
            moments: vec![Vec::new(); SCHEDULE_LENGTH],
            occupancy: vec![BTreeMap::new(); SCHEDULE_LENGTH],
        }
    }
}

fn reset_gate(basis: Basis) -> Gate {
    match basis {
        Basis::X => Gate::RX,
        Basis::Y => Gate::RY,
        Basis::Z => Gate::R,
    }
}

fn measurement_gate(basis: Basis) -> Gate {
    match basis {
        Basis::X => Gate::MX,
        Basis::Y => Gate::MY,
        Basis::Z => Gate::M,
    }
}

fn controlled_gate(basis: Basis) -> Gate {
    match basis {
        Basis::X => Gate::CX,
        Basis::Y => Gate::CY,
        Basis::Z => Gate::CZ,
    }
}

impl ScheduledCircuit {
    /// Schedule the operations of every placed plaquette.
    pub fn from_plaquettes(placed: &[PlacedPlaquette]) -> Result<Self, PlaquetteError> {
        let mut circuit = Self::default();
        for plaquette in placed {
            circuit.add_plaquette(plaquette)?;
        }
        Ok(circuit)
    }

    fn add_plaquette(&mut self, plaquette: &PlacedPlaquette) -> Result<(), PlaquetteError> {
        let description = &plaquette.description;
        if description.is_empty() {
            return Ok(());
        }
        let ancilla = plaquette.ancilla();
        let ancilla_bases = description.ancilla();
        self.insert(
            RESET_MOMENT,
            Operation::single(reset_gate(ancilla_bases.reset), ancilla),
        )?;
        self.insert(
            MEASUREMENT_MOMENT,
            Operation::single(measurement_gate(ancilla_bases.measurement), ancilla),
        )?;

        for (rpng, data) in description.corners().iter().zip(plaquette.corner_qubits()) {
            if let Some(reset) = rpng.reset {
                let gate = match reset {
                    ExtendedBasis::Basis(b) => reset_gate(b),
                    ExtendedBasis::H => Gate::H,
                };
                self.insert(RESET_MOMENT, Operation::single(gate, data))?;
            }
            if let (Some(basis), Some(step)) = (rpng.controlled, rpng.step) {
                self.insert(
                    usize::from(step),
                    Operation {
                        gate: controlled_gate(basis),
                        qubits: vec![ancilla, data],
                    },
                )?;
            }
            if let Some(measurement) = rpng.measurement {
                let gate = match measurement {
                    ExtendedBasis::Basis(b) => measurement_gate(b),
                    ExtendedBasis::H => Gate::H,
                };
                self.insert(MEASUREMENT_MOMENT, Operation::single(gate, data))?;
            }
        }
        Ok(())
    }

    fn insert(&mut self, moment: usize, operation: Operation) -> Result<(), PlaquetteError> {
        let occupancy = &self.occupancy[moment];
        for qubit in &operation.qubits {
            let Some(&existing) = occupancy.get(qubit) else {
                continue;
            };
            if self.moments[moment][existing] == operation {
                return Ok(());
            }
            return Err(PlaquetteError::QubitConflict {
                qubit: qubit.to_string(),
                moment,
            });
        }
        let position = self.moments[moment].len();
        for qubit in &operation.qubits {
            self.occupancy[moment].insert(*qubit, position);
        }
        self.moments[moment].push(operation);
        Ok(())
    }

    pub fn moments(&self) -> &[Vec<Operation>] {
        &self.moments
    }

    pub fn is_empty(&self) -> bool {
        self.moments.iter().all(Vec::is_empty)
    }

    /// Every qubit touched by at least one operation.
    pub fn qubits(&self) -> BTreeSet<GridQubit> {
        self.occupancy
            .iter()
            .flat_map(|moment| moment.keys().copied())
            .collect()
    }

    /// Gates of one moment in emission order: grouped by gate, targets sorted
    /// by qubit index.
    fn ordered_moment(
        &self,
        moment: usize,
        qubit_map: &QubitMap,
    ) -> Result<BTreeMap<Gate, Vec<Vec<usize>>>, PlaquetteError> {
        let mut grouped: BTreeMap<Gate, Vec<Vec<usize>>> = BTreeMap::new();
        for operation in &self.moments[moment] {
            let targets = operation
                .qubits
                .iter()
                .map(|q| qubit_map.index_of(q))
                .collect::<Result<Vec<_>, _>>()?;
            grouped.entry(operation.gate).or_default().push(targets);
        }
        for targets in grouped.values_mut() {
            targets.sort();
        }
        Ok(grouped)
    }

    /// Circuit of this layer, one `TICK` after each non-empty moment.
    pub fn to_circuit(&self, qubit_map: &QubitMap) -> Result<Circuit, PlaquetteError> {
        let mut circuit = Circuit::new();
        for moment in 0..self.moments.len() {
            if self.moments[moment].is_empty() {
                continue;
            }
            for (gate, targets) in self.ordered_moment(moment, qubit_map)? {
                circuit.push_gate(gate, targets.into_iter().flatten().collect());
            }
            circuit.push(Instruction::Tick);
        }
        Ok(circuit)
    }

    /// Measured qubits in the order their results enter the measurement record
    /// when emitted with [`ScheduledCircuit::to_circuit`].
    pub fn measurement_record(&self, qubit_map: &QubitMap) -> Result<Vec<GridQubit>, PlaquetteError> {
        let mut record = Vec::new();
        for moment in 0..self.moments.len() {
            for (gate, targets) in self.ordered_moment(moment, qubit_map)? {
                if !gate.is_measurement() {
                    continue;
                }
                for target in targets.into_iter().flatten() {
                    let qubit = qubit_map.qubit(target).ok_or_else(|| {
                        PlaquetteError::QubitMap(QubitMapError::UnknownQubit {
                            qubit: format!("index {target}"),
                        })
                    })?;
                    record.push(qubit);
                }
            }
        }
        Ok(record)
    }
}

/// Generate the scheduled circuit of `plaquettes` laid out on `template`.
pub fn generate_circuit(
    template: Template,
    k: u32,
    plaquettes: &Plaquettes,
    origin: Position2D,
) -> Result<ScheduledCircuit, PlaquetteError> {
    let placed = place_plaquettes(template, k, plaquettes, origin);
    debug!(
        template = template.name(),
        k,
        plaquettes = placed.len(),
        "Generating layer circuit"
    );
    ScheduledCircuit::from_plaquettes(&placed)
}
