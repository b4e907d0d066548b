//! # Layer Tree
//!
//! Entry point for circuit generation. Annotations are computed lazily the
//! first time a scale is requested and kept for the lifetime of the tree.

use std::collections::BTreeMap;

use shared_types::{Circuit, QubitMap};
use tracing::info;

use crate::adapters::detector_database::DetectorDatabase;
use crate::algorithms::emission::Emitter;
use crate::algorithms::walkers::{CircuitAnnotator, DetectorAnnotator, QubitLister};
use crate::config::AnnotationConfig;
use crate::domain::annotations::{MeasurementRecord, TreeAnnotations};
use crate::domain::errors::TreeError;
use crate::domain::node::{LayerNode, MergedLayer};
use crate::domain::observables::AbstractObservable;

/// A merged computation, ready to be instantiated at any scale.
#[derive(Debug)]
pub struct LayerTree {
    root: LayerNode,
    observables: Vec<AbstractObservable>,
    config: AnnotationConfig,
    annotations: BTreeMap<u32, TreeAnnotations>,
    database: DetectorDatabase,
}

impl LayerTree {
    pub fn new(
        root: &MergedLayer,
        observables: Vec<AbstractObservable>,
        config: AnnotationConfig,
    ) -> Self {
        Self {
            root: LayerNode::from_layer(root),
            observables,
            config,
            annotations: BTreeMap::new(),
            database: DetectorDatabase::new(),
        }
    }

    pub fn root(&self) -> &LayerNode {
        &self.root
    }

    pub fn observables(&self) -> &[AbstractObservable] {
        &self.observables
    }

    pub fn config(&self) -> &AnnotationConfig {
        &self.config
    }

    pub fn database(&self) -> &DetectorDatabase {
        &self.database
    }

    /// Scales whose annotations are cached.
    pub fn annotated_scales(&self) -> impl Iterator<Item = u32> + '_ {
        self.annotations.keys().copied()
    }

    /// Annotations at scale `k`, computed on first request.
    pub fn annotate(&mut self, k: u32) -> Result<&TreeAnnotations, TreeError> {
        if !self.annotations.contains_key(&k) {
            let annotations = self.compute_annotations(k)?;
            self.annotations.insert(k, annotations);
        }
        self.annotations
            .get(&k)
            .ok_or_else(|| TreeError::MissingAnnotation(format!("annotations for k = {k}")))
    }

    fn compute_annotations(&mut self, k: u32) -> Result<TreeAnnotations, TreeError> {
        let mut circuits = CircuitAnnotator::new(k);
        self.root.walk(&mut circuits)?;
        let leaves = circuits.into_leaves();

        let mut lister = QubitLister::new(&leaves);
        self.root.walk(&mut lister)?;
        let qubit_map = QubitMap::from_qubits(lister.into_qubits())?;

        let records = leaves
            .iter()
            .map(|(id, leaf)| -> Result<_, TreeError> {
                let measured = leaf.circuit.measurement_record(&qubit_map)?;
                Ok((*id, MeasurementRecord::new(&measured)))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        let mut annotator = DetectorAnnotator::new(k, &self.config, &leaves, &mut self.database);
        self.root.walk(&mut annotator)?;
        let detectors = annotator.into_detectors();

        info!(
            k,
            leaves = leaves.len(),
            qubits = qubit_map.len(),
            cached_patterns = self.database.len(),
            "Annotated layer tree"
        );
        Ok(TreeAnnotations {
            leaves,
            qubit_map,
            records,
            detectors,
        })
    }

    /// Circuit of the computation at scale `k`.
    ///
    /// `QUBIT_COORDS` declarations are emitted first when
    /// `include_qubit_coords` is set.
    pub fn generate_circuit(
        &mut self,
        k: u32,
        include_qubit_coords: bool,
    ) -> Result<Circuit, TreeError> {
        self.annotate(k)?;
        let annotations = self
            .annotations
            .get(&k)
            .ok_or_else(|| TreeError::MissingAnnotation(format!("annotations for k = {k}")))?;

        let mut circuit = if include_qubit_coords {
            annotations.qubit_map.to_circuit()
        } else {
            Circuit::new()
        };
        let emitter = Emitter::new(k, annotations);
        emitter.emit_node(&self.root, None, &mut circuit)?;
        let last = self.root.last_leaf(k)?;
        emitter.emit_observables(&self.observables, last, &mut circuit)?;

        info!(
            k,
            detectors = circuit.num_detectors(),
            measurements = circuit.num_measurements(),
            "Generated circuit"
        );
        Ok(circuit)
    }
}
