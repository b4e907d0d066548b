//! # Circuit Model
//!
//! A small stabilizer-circuit representation that renders to the text format
//! understood by stabilizer simulators. Measurement records are addressed with
//! negative offsets relative to the end of the record, as in `rec[-1]`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Clifford gates, resets and measurements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gate {
    R,
    RX,
    RY,
    H,
    CX,
    CY,
    CZ,
    M,
    MX,
    MY,
}

impl Gate {
    pub fn name(&self) -> &'static str {
        match self {
            Gate::R => "R",
            Gate::RX => "RX",
            Gate::RY => "RY",
            Gate::H => "H",
            Gate::CX => "CX",
            Gate::CY => "CY",
            Gate::CZ => "CZ",
            Gate::M => "M",
            Gate::MX => "MX",
            Gate::MY => "MY",
        }
    }

    /// Number of qubits each application of the gate acts on.
    pub fn arity(&self) -> usize {
        match self {
            Gate::CX | Gate::CY | Gate::CZ => 2,
            _ => 1,
        }
    }

    pub fn is_reset(&self) -> bool {
        matches!(self, Gate::R | Gate::RX | Gate::RY)
    }

    pub fn is_measurement(&self) -> bool {
        matches!(self, Gate::M | Gate::MX | Gate::MY)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pauli noise channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NoiseChannel {
    XError,
    ZError,
    Depolarize1,
    Depolarize2,
}

impl NoiseChannel {
    pub fn name(&self) -> &'static str {
        match self {
            NoiseChannel::XError => "X_ERROR",
            NoiseChannel::ZError => "Z_ERROR",
            NoiseChannel::Depolarize1 => "DEPOLARIZE1",
            NoiseChannel::Depolarize2 => "DEPOLARIZE2",
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            NoiseChannel::Depolarize2 => 2,
            _ => 1,
        }
    }
}

/// One line of a circuit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    Gate { gate: Gate, targets: Vec<usize> },
    Noise { channel: NoiseChannel, probability: f64, targets: Vec<usize> },
    Tick,
    QubitCoords { qubit: usize, coords: [i64; 2] },
    /// Parity of the referenced measurements, deterministic without noise.
    Detector { coords: [i64; 3], records: Vec<i64> },
    ObservableInclude { index: usize, records: Vec<i64> },
    ShiftCoords([i64; 3]),
    Repeat { count: u64, body: Circuit },
}

/// An ordered list of instructions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    instructions: Vec<Instruction>,
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    /// A circuit executing `body` `count` times.
    pub fn repeated(body: Circuit, count: u64) -> Self {
        let mut circuit = Self::new();
        circuit.push(Instruction::Repeat { count, body });
        circuit
    }

    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn push_gate(&mut self, gate: Gate, targets: Vec<usize>) {
        self.push(Instruction::Gate { gate, targets });
    }

    pub fn append(&mut self, other: Circuit) {
        self.instructions.extend(other.instructions);
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Total number of measurement results produced, repetitions included.
    pub fn num_measurements(&self) -> u64 {
        self.count(&|instruction: &Instruction| match instruction {
            Instruction::Gate { gate, targets } if gate.is_measurement() => targets.len() as u64,
            _ => 0,
        })
    }

    /// Total number of detectors declared, repetitions included.
    pub fn num_detectors(&self) -> u64 {
        self.count(&|instruction: &Instruction| {
            u64::from(matches!(instruction, Instruction::Detector { .. }))
        })
    }

    pub fn num_ticks(&self) -> u64 {
        self.count(&|instruction: &Instruction| {
            u64::from(matches!(instruction, Instruction::Tick))
        })
    }

    /// One more than the largest observable index referenced.
    pub fn num_observables(&self) -> usize {
        self.instructions
            .iter()
            .map(|instruction| match instruction {
                Instruction::ObservableInclude { index, .. } => index + 1,
                Instruction::Repeat { body, .. } => body.num_observables(),
                _ => 0,
            })
            .max()
            .unwrap_or(0)
    }

    /// Same circuit with every `REPEAT` block unrolled.
    pub fn flattened(&self) -> Circuit {
        let mut flat = Circuit::new();
        for instruction in &self.instructions {
            match instruction {
                Instruction::Repeat { count, body } => {
                    let body = body.flattened();
                    for _ in 0..*count {
                        flat.instructions.extend(body.instructions.iter().cloned());
                    }
                }
                other => flat.push(other.clone()),
            }
        }
        flat
    }

    fn count(&self, per_instruction: &dyn Fn(&Instruction) -> u64) -> u64 {
        self.instructions
            .iter()
            .map(|instruction| match instruction {
                Instruction::Repeat { count, body } => count * body.count(per_instruction),
                other => per_instruction(other),
            })
            .sum()
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let pad = " ".repeat(indent);
        for instruction in &self.instructions {
            match instruction {
                Instruction::Gate { gate, targets } => {
                    writeln!(f, "{pad}{}{}", gate.name(), format_targets(targets))?
                }
                Instruction::Noise {
                    channel,
                    probability,
                    targets,
                } => writeln!(
                    f,
                    "{pad}{}({}){}",
                    channel.name(),
                    probability,
                    format_targets(targets)
                )?,
                Instruction::Tick => writeln!(f, "{pad}TICK")?,
                Instruction::QubitCoords { qubit, coords } => {
                    writeln!(f, "{pad}QUBIT_COORDS({}, {}) {}", coords[0], coords[1], qubit)?
                }
                Instruction::Detector { coords, records } => writeln!(
                    f,
                    "{pad}DETECTOR({}, {}, {}){}",
                    coords[0],
                    coords[1],
                    coords[2],
                    format_records(records)
                )?,
                Instruction::ObservableInclude { index, records } => writeln!(
                    f,
                    "{pad}OBSERVABLE_INCLUDE({}){}",
                    index,
                    format_records(records)
                )?,
                Instruction::ShiftCoords(shift) => writeln!(
                    f,
                    "{pad}SHIFT_COORDS({}, {}, {})",
                    shift[0], shift[1], shift[2]
                )?,
                Instruction::Repeat { count, body } => {
                    writeln!(f, "{pad}REPEAT {count} {{")?;
                    body.write_indented(f, indent + 4)?;
                    writeln!(f, "{pad}}}")?;
                }
            }
        }
        Ok(())
    }
}

fn format_targets(targets: &[usize]) -> String {
    targets.iter().map(|t| format!(" {t}")).collect()
}

fn format_records(records: &[i64]) -> String {
    records.iter().map(|r| format!(" rec[{r}]")).collect()
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}
