//! Annotation walkers
//!
//! Three passes over the tree compute everything needed to emit a circuit at
//! one scale: the scheduled circuit of every leaf, the qubits of the whole
//! computation, and the detectors of every leaf for every predecessor it can
//! execute after.

use std::collections::{BTreeMap, BTreeSet};

use sc_01_plaquettes::PlacedPlaquette;
use shared_types::{GridQubit, Position2D, Shift2D};
use tracing::debug;

use super::flows::{compute_detectors, CornerBoundary, LocalPattern, PlaquetteBoundary};
use crate::adapters::detector_database::DetectorDatabase;
use crate::config::AnnotationConfig;
use crate::domain::annotations::{DetectorKey, LeafAnnotations, LeafBoundary};
use crate::domain::detectors::Detector;
use crate::domain::errors::TreeError;
use crate::domain::node::{LayerNode, LeafId, PlacedLayer};
use crate::ports::walker::NodeWalker;

// =============================================================================
// Circuits
// =============================================================================

/// Generates the scheduled circuit of every leaf.
pub struct CircuitAnnotator {
    k: u32,
    leaves: BTreeMap<LeafId, LeafAnnotations>,
}

impl CircuitAnnotator {
    pub fn new(k: u32) -> Self {
        Self {
            k,
            leaves: BTreeMap::new(),
        }
    }

    pub fn into_leaves(self) -> BTreeMap<LeafId, LeafAnnotations> {
        self.leaves
    }
}

impl NodeWalker for CircuitAnnotator {
    fn visit_leaf(&mut self, id: LeafId, layer: &PlacedLayer) -> Result<(), TreeError> {
        if self.leaves.contains_key(&id) {
            return Ok(());
        }
        let plaquettes = layer.placed_plaquettes(self.k);
        let circuit = layer.scheduled_circuit(self.k)?;
        let boundary = LeafBoundary::from_circuit(&circuit);
        self.leaves.insert(
            id,
            LeafAnnotations {
                circuit,
                plaquettes,
                boundary,
            },
        );
        Ok(())
    }
}

// =============================================================================
// Qubits
// =============================================================================

/// Collects every qubit touched by a leaf.
pub struct QubitLister<'a> {
    leaves: &'a BTreeMap<LeafId, LeafAnnotations>,
    qubits: BTreeSet<GridQubit>,
}

impl<'a> QubitLister<'a> {
    pub fn new(leaves: &'a BTreeMap<LeafId, LeafAnnotations>) -> Self {
        Self {
            leaves,
            qubits: BTreeSet::new(),
        }
    }

    /// Collected qubits, sorted.
    pub fn into_qubits(self) -> BTreeSet<GridQubit> {
        self.qubits
    }
}

impl NodeWalker for QubitLister<'_> {
    fn visit_leaf(&mut self, id: LeafId, _layer: &PlacedLayer) -> Result<(), TreeError> {
        let leaf = self
            .leaves
            .get(&id)
            .ok_or_else(|| TreeError::MissingAnnotation(format!("circuit of leaf {id}")))?;
        self.qubits.extend(leaf.circuit.qubits());
        Ok(())
    }
}

// =============================================================================
// Detectors
// =============================================================================

fn plaquette_boundary(plaquette: &PlacedPlaquette, boundary: &LeafBoundary) -> PlaquetteBoundary {
    let mut corners = [CornerBoundary::default(); 4];
    let descriptions = plaquette.description.corners();
    for (index, qubit) in plaquette.corner_qubits().iter().enumerate() {
        if !descriptions[index].interacts() {
            continue;
        }
        corners[index] = CornerBoundary {
            interacts: true,
            reset: boundary.resets.get(qubit).copied(),
            measurement: boundary.measurements.get(qubit).copied(),
        };
    }
    PlaquetteBoundary {
        basis: plaquette.description.stabilizer_basis(),
        corners,
    }
}

/// Computes the detectors of every leaf for the predecessor it executes
/// after. Repetitions with at least two iterations are walked a second time
/// with the body's last leaf as predecessor.
pub struct DetectorAnnotator<'a> {
    k: u32,
    config: &'a AnnotationConfig,
    leaves: &'a BTreeMap<LeafId, LeafAnnotations>,
    database: &'a mut DetectorDatabase,
    previous: Option<LeafId>,
    detectors: BTreeMap<DetectorKey, Vec<Detector>>,
}

impl<'a> DetectorAnnotator<'a> {
    pub fn new(
        k: u32,
        config: &'a AnnotationConfig,
        leaves: &'a BTreeMap<LeafId, LeafAnnotations>,
        database: &'a mut DetectorDatabase,
    ) -> Self {
        Self {
            k,
            config,
            leaves,
            database,
            previous: None,
            detectors: BTreeMap::new(),
        }
    }

    pub fn into_detectors(self) -> BTreeMap<DetectorKey, Vec<Detector>> {
        self.detectors
    }

    fn leaf(&self, id: LeafId) -> Result<&'a LeafAnnotations, TreeError> {
        self.leaves
            .get(&id)
            .ok_or_else(|| TreeError::MissingAnnotation(format!("circuit of leaf {id}")))
    }

    fn compute(
        &mut self,
        current: &LeafAnnotations,
        previous: Option<&LeafAnnotations>,
    ) -> Result<Vec<Detector>, TreeError> {
        let radius = self.config.manhattan_radius as i64;
        let mut neighbours: BTreeMap<Position2D, Vec<PlaquetteBoundary>> = BTreeMap::new();
        if let Some(previous) = previous {
            for plaquette in &previous.plaquettes {
                neighbours
                    .entry(plaquette.position)
                    .or_default()
                    .push(plaquette_boundary(plaquette, &previous.boundary));
            }
        }

        let mut detectors = Vec::new();
        for plaquette in &current.plaquettes {
            let centre = plaquette_boundary(plaquette, &current.boundary);
            if centre.basis.is_none() {
                continue;
            }
            let mut pattern = LocalPattern {
                centre,
                previous: Vec::new(),
            };
            for dy in -radius..=radius {
                let span = radius - dy.abs();
                for dx in -span..=span {
                    let shift = Shift2D::new(dx, dy);
                    if let Some(found) = neighbours.get(&(plaquette.position + shift)) {
                        pattern
                            .previous
                            .extend(found.iter().map(|boundary| (shift, *boundary)));
                    }
                }
            }
            let relative = if self.config.use_detector_database {
                self.database.get_or_compute(&pattern, compute_detectors)?
            } else {
                compute_detectors(&pattern)
            };
            detectors.extend(relative.iter().map(|d| d.at(plaquette.ancilla())));
        }
        Ok(detectors)
    }
}

impl NodeWalker for DetectorAnnotator<'_> {
    fn enter_node(&mut self, node: &LayerNode) -> Result<bool, TreeError> {
        Ok(node.repetitions_at(self.k)? > 0)
    }

    fn visit_leaf(&mut self, id: LeafId, _layer: &PlacedLayer) -> Result<(), TreeError> {
        let key = (id, self.previous);
        if !self.detectors.contains_key(&key) {
            let current = self.leaf(id)?;
            let previous = self.previous.map(|p| self.leaf(p)).transpose()?;
            let detectors = self.compute(current, previous)?;
            debug!(
                leaf = id,
                previous = ?self.previous,
                detectors = detectors.len(),
                "Annotated leaf detectors"
            );
            self.detectors.insert(key, detectors);
        }
        self.previous = Some(id);
        Ok(())
    }

    fn exit_node(&mut self, node: &LayerNode) -> Result<(), TreeError> {
        let LayerNode::Repetition { body, .. } = node else {
            return Ok(());
        };
        if node.repetitions_at(self.k)? < 2 {
            return Ok(());
        }
        let Some(last) = body.last_leaf(self.k)? else {
            return Ok(());
        };
        self.previous = Some(last);
        body.walk(self)
    }
}
