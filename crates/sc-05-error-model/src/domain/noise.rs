//! Circuit-level noise models
//!
//! A noise model decorates a noiseless circuit with Pauli channels: after
//! resets and gates, before measurements and, optionally, on every qubit left
//! idle during a moment.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use shared_types::{Circuit, Gate, Instruction, NoiseChannel};

use super::errors::ErrorModelError;

/// Probabilities of the channels inserted by [`NoiseModel::apply`].
///
/// A `None` field inserts nothing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseModel {
    /// `DEPOLARIZE1` after every reset
    pub after_reset: Option<f64>,
    /// `DEPOLARIZE1` after every single-qubit gate
    pub after_single_qubit_gate: Option<f64>,
    /// `DEPOLARIZE2` after every two-qubit gate
    pub after_two_qubit_gate: Option<f64>,
    /// Flip of the measured basis before every measurement
    pub measurement_flip: Option<f64>,
    /// `DEPOLARIZE1` on qubits untouched during a moment
    pub idle: Option<f64>,
}

impl NoiseModel {
    /// Same depolarizing strength `p` on every operation.
    pub fn uniform_depolarizing(p: f64) -> Self {
        Self {
            after_reset: Some(p),
            after_single_qubit_gate: Some(p),
            after_two_qubit_gate: Some(p),
            measurement_flip: Some(p),
            idle: None,
        }
    }

    /// Only measurement results are noisy.
    pub fn before_measure_flip(p: f64) -> Self {
        Self {
            measurement_flip: Some(p),
            ..Self::default()
        }
    }

    pub fn with_idle_depolarization(mut self, p: f64) -> Self {
        self.idle = Some(p);
        self
    }

    pub fn validate(&self) -> Result<(), ErrorModelError> {
        [
            self.after_reset,
            self.after_single_qubit_gate,
            self.after_two_qubit_gate,
            self.measurement_flip,
            self.idle,
        ]
        .into_iter()
        .flatten()
        .find(|p| !(0.0..=1.0).contains(p))
        .map_or(Ok(()), |probability| {
            Err(ErrorModelError::InvalidProbability { probability })
        })
    }

    /// Noisy copy of `circuit`. `REPEAT` blocks are kept and decorated
    /// recursively.
    pub fn apply(&self, circuit: &Circuit) -> Result<Circuit, ErrorModelError> {
        self.validate()?;
        let num_qubits = largest_target(circuit).map_or(0, |qubit| qubit + 1);
        Ok(self.decorate(circuit, num_qubits))
    }

    fn decorate(&self, circuit: &Circuit, num_qubits: usize) -> Circuit {
        let mut noisy = Circuit::new();
        let mut active = BTreeSet::new();
        for instruction in circuit.instructions() {
            match instruction {
                Instruction::Gate { gate, targets } => {
                    active.extend(targets.iter().copied());
                    if gate.is_measurement() {
                        if let Some(probability) = self.measurement_flip {
                            push_noise(&mut noisy, flip_channel(*gate), probability, targets);
                        }
                    }
                    noisy.push(instruction.clone());
                    if let Some(probability) = self.after_gate(*gate) {
                        let channel = if gate.arity() == 2 {
                            NoiseChannel::Depolarize2
                        } else {
                            NoiseChannel::Depolarize1
                        };
                        push_noise(&mut noisy, channel, probability, targets);
                    }
                }
                Instruction::Tick => {
                    if let Some(probability) = self.idle {
                        let idle: Vec<usize> =
                            (0..num_qubits).filter(|q| !active.contains(q)).collect();
                        push_noise(&mut noisy, NoiseChannel::Depolarize1, probability, &idle);
                    }
                    active.clear();
                    noisy.push(Instruction::Tick);
                }
                Instruction::Repeat { count, body } => noisy.push(Instruction::Repeat {
                    count: *count,
                    body: self.decorate(body, num_qubits),
                }),
                other => noisy.push(other.clone()),
            }
        }
        noisy
    }

    fn after_gate(&self, gate: Gate) -> Option<f64> {
        if gate.is_reset() {
            self.after_reset
        } else if gate.is_measurement() {
            None
        } else if gate.arity() == 2 {
            self.after_two_qubit_gate
        } else {
            self.after_single_qubit_gate
        }
    }
}

/// Pauli error that flips the result of `measurement`.
fn flip_channel(measurement: Gate) -> NoiseChannel {
    match measurement {
        Gate::MX => NoiseChannel::ZError,
        _ => NoiseChannel::XError,
    }
}

fn push_noise(circuit: &mut Circuit, channel: NoiseChannel, probability: f64, targets: &[usize]) {
    if probability > 0.0 && !targets.is_empty() {
        circuit.push(Instruction::Noise {
            channel,
            probability,
            targets: targets.to_vec(),
        });
    }
}

fn largest_target(circuit: &Circuit) -> Option<usize> {
    circuit
        .instructions()
        .iter()
        .filter_map(|instruction| match instruction {
            Instruction::Gate { targets, .. } | Instruction::Noise { targets, .. } => {
                targets.iter().copied().max()
            }
            Instruction::QubitCoords { qubit, .. } => Some(*qubit),
            Instruction::Repeat { body, .. } => largest_target(body),
            _ => None,
        })
        .max()
}
