//! Detector error model extraction by Pauli propagation
//!
//! Every Pauli component of every noise channel is pushed forward through
//! the unrolled circuit as a sparse Pauli frame. The measurements it flips
//! are turned into detector and observable symptoms, and components with the
//! same symptom are merged into a single mechanism.

use std::collections::{BTreeMap, BTreeSet};

use shared_types::{Circuit, Gate, Instruction, NoiseChannel};
use tracing::{debug, info};

use crate::domain::error_model::{DetectorErrorModel, ErrorMechanism};
use crate::domain::errors::ErrorModelError;

/// Pauli on one qubit as its X and Z parts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct PauliBits {
    x: bool,
    z: bool,
}

impl PauliBits {
    const X: Self = Self { x: true, z: false };
    const Z: Self = Self { x: false, z: true };

    fn is_identity(&self) -> bool {
        !self.x && !self.z
    }
}

/// Detectors and observables flipped by an error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Symptom {
    detectors: BTreeSet<usize>,
    observables: u64,
}

impl Symptom {
    fn toggle(&mut self, other: &Symptom) {
        for detector in &other.detectors {
            if !self.detectors.remove(detector) {
                self.detectors.insert(*detector);
            }
        }
        self.observables ^= other.observables;
    }

    fn combined(parts: &[&Symptom]) -> Symptom {
        let mut symptom = Symptom::default();
        for part in parts {
            symptom.toggle(part);
        }
        symptom
    }

    fn is_empty(&self) -> bool {
        self.detectors.is_empty() && self.observables == 0
    }
}

/// Symptom of flipping each measurement of the unrolled circuit.
struct MeasurementSensitivity {
    symptoms: Vec<Symptom>,
    num_detectors: usize,
    num_observables: usize,
}

impl MeasurementSensitivity {
    fn from_instructions(instructions: &[Instruction]) -> Result<Self, ErrorModelError> {
        let mut symptoms: Vec<Symptom> = Vec::new();
        let mut num_detectors = 0;
        let mut num_observables = 0;
        for instruction in instructions {
            match instruction {
                Instruction::Gate { gate, targets } if gate.is_measurement() => {
                    symptoms.extend(targets.iter().map(|_| Symptom::default()));
                }
                Instruction::Detector { records, .. } => {
                    for record in records {
                        let measurement = resolve(*record, symptoms.len())?;
                        let detectors = &mut symptoms[measurement].detectors;
                        if !detectors.remove(&num_detectors) {
                            detectors.insert(num_detectors);
                        }
                    }
                    num_detectors += 1;
                }
                Instruction::ObservableInclude { index, records } => {
                    if *index >= u64::BITS as usize {
                        return Err(ErrorModelError::TooManyObservables { index: *index });
                    }
                    for record in records {
                        let measurement = resolve(*record, symptoms.len())?;
                        symptoms[measurement].observables ^= 1 << index;
                    }
                    num_observables = num_observables.max(index + 1);
                }
                _ => {}
            }
        }
        Ok(Self {
            symptoms,
            num_detectors,
            num_observables,
        })
    }
}

/// Absolute index of the measurement `offset` records back.
fn resolve(offset: i64, available: usize) -> Result<usize, ErrorModelError> {
    let invalid = ErrorModelError::InvalidRecord { offset, available };
    if offset >= 0 {
        return Err(invalid);
    }
    let back = usize::try_from(offset.unsigned_abs()).map_err(|_| invalid.clone())?;
    available.checked_sub(back).ok_or(invalid)
}

/// Sparse Pauli frame pushed through the circuit.
#[derive(Default)]
struct PauliFrame {
    paulis: BTreeMap<usize, PauliBits>,
}

impl PauliFrame {
    fn get(&self, qubit: usize) -> PauliBits {
        self.paulis.get(&qubit).copied().unwrap_or_default()
    }

    fn set(&mut self, qubit: usize, pauli: PauliBits) {
        if pauli.is_identity() {
            self.paulis.remove(&qubit);
        } else {
            self.paulis.insert(qubit, pauli);
        }
    }

    fn is_identity(&self) -> bool {
        self.paulis.is_empty()
    }

    /// Conjugate the frame by `gate`. Returns, for a measurement, whether each
    /// target's result is flipped.
    fn apply(&mut self, gate: Gate, targets: &[usize], flips: &mut Vec<bool>) {
        match gate {
            Gate::R | Gate::RX | Gate::RY => {
                for qubit in targets {
                    self.paulis.remove(qubit);
                }
            }
            Gate::H => {
                for &qubit in targets {
                    let p = self.get(qubit);
                    self.set(qubit, PauliBits { x: p.z, z: p.x });
                }
            }
            Gate::CX | Gate::CY | Gate::CZ => {
                for pair in targets.chunks_exact(2) {
                    let (a, b) = (pair[0], pair[1]);
                    let (pa, pb) = (self.get(a), self.get(b));
                    if pa.is_identity() && pb.is_identity() {
                        continue;
                    }
                    let (pa, pb) = conjugate_controlled(gate, pa, pb);
                    self.set(a, pa);
                    self.set(b, pb);
                }
            }
            Gate::M | Gate::MX | Gate::MY => {
                for &qubit in targets {
                    let p = self.get(qubit);
                    let (flipped, remaining) = match gate {
                        Gate::M => (p.x, PauliBits { x: p.x, z: false }),
                        Gate::MX => (p.z, PauliBits { x: false, z: p.z }),
                        _ if p.x && p.z => (false, PauliBits::default()),
                        _ => (p.x ^ p.z, p),
                    };
                    flips.push(flipped);
                    self.set(qubit, remaining);
                }
            }
        }
    }
}

/// Image of `control ⊗ target` under an ancilla-controlled Pauli gate.
fn conjugate_controlled(gate: Gate, control: PauliBits, target: PauliBits) -> (PauliBits, PauliBits) {
    match gate {
        Gate::CX => (
            PauliBits {
                x: control.x,
                z: control.z ^ target.z,
            },
            PauliBits {
                x: target.x ^ control.x,
                z: target.z,
            },
        ),
        Gate::CY => (
            PauliBits {
                x: control.x,
                z: control.z ^ target.x ^ target.z,
            },
            PauliBits {
                x: target.x ^ control.x,
                z: target.z ^ control.x,
            },
        ),
        _ => (
            PauliBits {
                x: control.x,
                z: control.z ^ target.x,
            },
            PauliBits {
                x: target.x,
                z: target.z ^ control.x,
            },
        ),
    }
}

/// Symptom of `pauli` on `qubit` inserted just before `instructions[start]`.
fn propagate(
    instructions: &[Instruction],
    start: usize,
    first_measurement: usize,
    qubit: usize,
    pauli: PauliBits,
    sensitivity: &MeasurementSensitivity,
) -> Symptom {
    let mut frame = PauliFrame::default();
    frame.set(qubit, pauli);
    let mut symptom = Symptom::default();
    let mut measurement = first_measurement;
    let mut flips = Vec::new();
    for instruction in &instructions[start..] {
        if frame.is_identity() {
            break;
        }
        let Instruction::Gate { gate, targets } = instruction else {
            continue;
        };
        flips.clear();
        frame.apply(*gate, targets, &mut flips);
        for flipped in &flips {
            if *flipped {
                symptom.toggle(&sensitivity.symptoms[measurement]);
            }
            measurement += 1;
        }
    }
    symptom
}

/// Pauli components of a channel on one target group, as `(probability,
/// Pauli per target)`.
fn components(channel: NoiseChannel, probability: f64) -> Vec<(f64, Vec<PauliBits>)> {
    const PAULIS: [PauliBits; 3] = [
        PauliBits::X,
        PauliBits { x: true, z: true },
        PauliBits::Z,
    ];
    match channel {
        NoiseChannel::XError => vec![(probability, vec![PauliBits::X])],
        NoiseChannel::ZError => vec![(probability, vec![PauliBits::Z])],
        NoiseChannel::Depolarize1 => PAULIS
            .iter()
            .map(|p| (probability / 3.0, vec![*p]))
            .collect(),
        NoiseChannel::Depolarize2 => {
            let identity = PauliBits::default();
            let all = [identity, PAULIS[0], PAULIS[1], PAULIS[2]];
            all.iter()
                .flat_map(|a| all.iter().map(move |b| (*a, *b)))
                .filter(|(a, b)| !(a.is_identity() && b.is_identity()))
                .map(|(a, b)| (probability / 15.0, vec![a, b]))
                .collect()
        }
    }
}

/// Probability that exactly one of two independent events happens.
fn xor_probability(p: f64, q: f64) -> f64 {
    p * (1.0 - q) + q * (1.0 - p)
}

pub fn extract_error_model(circuit: &Circuit) -> Result<DetectorErrorModel, ErrorModelError> {
    let flat = circuit.flattened();
    let instructions = flat.instructions();
    let sensitivity = MeasurementSensitivity::from_instructions(instructions)?;

    let mut merged: BTreeMap<(Vec<usize>, u64), f64> = BTreeMap::new();
    let mut measurements_so_far = 0;
    let mut components_seen = 0usize;
    for (index, instruction) in instructions.iter().enumerate() {
        let (channel, probability, targets) = match instruction {
            Instruction::Gate { gate, targets } => {
                if gate.is_measurement() {
                    measurements_so_far += targets.len();
                }
                check_arity(gate.name(), gate.arity(), targets)?;
                continue;
            }
            Instruction::Noise {
                channel,
                probability,
                targets,
            } => (*channel, *probability, targets),
            _ => continue,
        };
        check_arity(channel.name(), channel.arity(), targets)?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(ErrorModelError::InvalidProbability { probability });
        }
        if probability == 0.0 {
            continue;
        }

        let next = index + 1;
        for group in targets.chunks_exact(channel.arity()) {
            // Symptoms are linear in the Pauli, so X and Z parts suffice.
            let basis: Vec<(Symptom, Symptom)> = group
                .iter()
                .map(|&qubit| {
                    let along = |pauli| {
                        propagate(instructions, next, measurements_so_far, qubit, pauli, &sensitivity)
                    };
                    (along(PauliBits::X), along(PauliBits::Z))
                })
                .collect();

            for (component_probability, paulis) in components(channel, probability) {
                components_seen += 1;
                let mut parts = Vec::new();
                for (pauli, (x_part, z_part)) in paulis.iter().zip(&basis) {
                    if pauli.x {
                        parts.push(x_part);
                    }
                    if pauli.z {
                        parts.push(z_part);
                    }
                }
                let symptom = Symptom::combined(&parts);
                if symptom.is_empty() {
                    continue;
                }
                let key = (
                    symptom.detectors.into_iter().collect::<Vec<_>>(),
                    symptom.observables,
                );
                let entry = merged.entry(key).or_insert(0.0);
                *entry = xor_probability(*entry, component_probability);
            }
        }
    }

    let errors: Vec<ErrorMechanism> = merged
        .into_iter()
        .map(|((detectors, observables), probability)| ErrorMechanism {
            probability,
            detectors,
            observables,
        })
        .collect();
    debug!(components = components_seen, "Propagated noise components");
    info!(
        detectors = sensitivity.num_detectors,
        observables = sensitivity.num_observables,
        errors = errors.len(),
        "Extracted detector error model"
    );
    Ok(DetectorErrorModel::new(
        sensitivity.num_detectors,
        sensitivity.num_observables,
        errors,
    ))
}

fn check_arity(operation: &str, arity: usize, targets: &[usize]) -> Result<(), ErrorModelError> {
    if targets.len() % arity != 0 {
        return Err(ErrorModelError::InvalidTargets {
            operation: operation.to_string(),
            arity,
            count: targets.len(),
        });
    }
    Ok(())
}
