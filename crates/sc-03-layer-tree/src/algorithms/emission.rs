//! Circuit emission
//!
//! Turns an annotated tree into a flat list of instructions, keeping
//! repetitions as `REPEAT` blocks. A repetition whose first iteration does
//! not match the steady iterations (different predecessor, hence different
//! detectors) has its first iteration peeled off.

use shared_types::{Circuit, Instruction};

use crate::domain::annotations::{MeasurementRecord, TreeAnnotations};
use crate::domain::detectors::{Detector, LeafSide};
use crate::domain::errors::TreeError;
use crate::domain::node::{LayerNode, LeafId};
use crate::domain::observables::AbstractObservable;

/// Emits the circuit of a tree annotated at scale `k`.
pub struct Emitter<'a> {
    k: u32,
    annotations: &'a TreeAnnotations,
}

impl<'a> Emitter<'a> {
    pub fn new(k: u32, annotations: &'a TreeAnnotations) -> Self {
        Self { k, annotations }
    }

    /// Append the instructions of `node` to `out`, executed after `previous`.
    /// Returns the last leaf executed so far.
    pub fn emit_node(
        &self,
        node: &LayerNode,
        previous: Option<LeafId>,
        out: &mut Circuit,
    ) -> Result<Option<LeafId>, TreeError> {
        match node {
            LayerNode::Leaf { id, .. } => {
                self.emit_leaf(*id, previous, out)?;
                Ok(Some(*id))
            }
            LayerNode::Sequence { children } => {
                let mut previous = previous;
                for child in children {
                    previous = self.emit_node(child, previous, out)?;
                }
                Ok(previous)
            }
            LayerNode::Repetition { body, .. } => {
                let repetitions = node.repetitions_at(self.k)?;
                if repetitions == 0 {
                    return Ok(previous);
                }
                let mut first = Circuit::new();
                let after_first = self.emit_node(body, previous, &mut first)?;
                let steady_previous = body.last_leaf(self.k)?;
                if repetitions == 1 || steady_previous.is_none() {
                    out.append(first);
                    return Ok(after_first);
                }

                let mut steady = Circuit::new();
                self.emit_node(body, steady_previous, &mut steady)?;
                if first == steady {
                    out.push(Instruction::Repeat {
                        count: repetitions,
                        body: first,
                    });
                } else {
                    out.append(first);
                    if repetitions == 2 {
                        out.append(steady);
                    } else {
                        out.push(Instruction::Repeat {
                            count: repetitions - 1,
                            body: steady,
                        });
                    }
                }
                Ok(steady_previous)
            }
        }
    }

    fn emit_leaf(
        &self,
        id: LeafId,
        previous: Option<LeafId>,
        out: &mut Circuit,
    ) -> Result<(), TreeError> {
        let leaf = self
            .annotations
            .leaves
            .get(&id)
            .ok_or_else(|| TreeError::MissingAnnotation(format!("circuit of leaf {id}")))?;
        let detectors = self
            .annotations
            .detectors
            .get(&(id, previous))
            .ok_or_else(|| {
                TreeError::MissingAnnotation(format!(
                    "detectors of leaf {id} after {previous:?}"
                ))
            })?;

        out.append(leaf.circuit.to_circuit(&self.annotations.qubit_map)?);
        for detector in detectors {
            out.push(self.detector_instruction(detector, id, previous)?);
        }
        out.push(Instruction::ShiftCoords([0, 0, 1]));
        Ok(())
    }

    fn detector_instruction(
        &self,
        detector: &Detector,
        id: LeafId,
        previous: Option<LeafId>,
    ) -> Result<Instruction, TreeError> {
        let current = self.record(id)?;
        let mut records = Vec::with_capacity(detector.measurements.len());
        for measurement in &detector.measurements {
            let (leaf, offset) = match (measurement.side, previous) {
                (LeafSide::Current, _) => (id, current.lookback(&measurement.qubit, 0)),
                (LeafSide::Previous, Some(previous)) => (
                    previous,
                    self.record(previous)?
                        .lookback(&measurement.qubit, current.len()),
                ),
                (LeafSide::Previous, None) => (id, None),
            };
            let offset = offset.ok_or_else(|| TreeError::MissingMeasurement {
                qubit: measurement.qubit.to_string(),
                leaf,
            })?;
            records.push(offset);
        }
        Ok(Instruction::Detector {
            coords: [detector.coordinates.x, detector.coordinates.y, 0],
            records,
        })
    }

    fn record(&self, id: LeafId) -> Result<&'a MeasurementRecord, TreeError> {
        self.annotations
            .records
            .get(&id)
            .ok_or_else(|| TreeError::MissingAnnotation(format!("measurement record of leaf {id}")))
    }

    /// `OBSERVABLE_INCLUDE` instructions reading `observables` out of the
    /// measurements of `last`, the final executed leaf.
    pub fn emit_observables(
        &self,
        observables: &[AbstractObservable],
        last: Option<LeafId>,
        out: &mut Circuit,
    ) -> Result<(), TreeError> {
        for (index, observable) in observables.iter().enumerate() {
            let Some(last) = last else {
                return Err(TreeError::NoFinalLayer {
                    name: observable.name.clone(),
                    k: self.k,
                });
            };
            let record = self.record(last)?;
            let records = observable
                .qubits(self.k)
                .iter()
                .map(|qubit| {
                    record
                        .lookback(qubit, 0)
                        .ok_or_else(|| TreeError::MissingMeasurement {
                            qubit: qubit.to_string(),
                            leaf: last,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            out.push(Instruction::ObservableInclude { index, records });
        }
        Ok(())
    }
}
