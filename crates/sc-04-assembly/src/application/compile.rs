//! # Block Graph Compilation
//!
//! Entry point from a spacetime diagram to a [`LayerTree`]:
//!
//! 1. reject open ports and validate the graph,
//! 2. move the earliest cubes to `z = 0`,
//! 3. build and assemble the blocks of every cube,
//! 4. merge the blocks of each time slice into one global stack,
//! 5. sequence the slices and wrap them in a tree.

use std::collections::BTreeMap;

use sc_02_layers::{merge_parallel_block_layers, Block, Layer, LayoutPosition, PlaquetteLayer};
use sc_03_layer_tree::{AnnotationConfig, LayerTree};
use shared_types::Position3D;
use tracing::{debug, info};

use crate::algorithms::assembly::assemble_blocks;
use crate::algorithms::readout::logical_readout;
use crate::domain::errors::AssemblyError;
use crate::domain::graph::BlockGraph;
use crate::ports::builders::{CubeBuilder, PipeBuilder};

/// Compile `graph` into a layer tree reading out the cubes at `observables`.
pub fn compile_block_graph<C, P>(
    graph: &BlockGraph,
    observables: &[Position3D],
    cube_builder: &C,
    pipe_builder: &P,
    config: AnnotationConfig,
) -> Result<LayerTree, AssemblyError>
where
    C: CubeBuilder + ?Sized,
    P: PipeBuilder + ?Sized,
{
    let ports = graph.num_ports();
    if ports > 0 {
        return Err(AssemblyError::OpenPorts { count: ports });
    }
    graph.validate()?;
    let readouts = observables
        .iter()
        .map(|position| logical_readout(graph, position))
        .collect::<Result<Vec<_>, _>>()?;

    let graph = graph.shift_min_z_to_zero();
    let blocks = assemble_blocks(&graph, cube_builder, pipe_builder)?;

    let mut slices: BTreeMap<i64, BTreeMap<LayoutPosition, Block<PlaquetteLayer>>> =
        BTreeMap::new();
    for (position, block) in blocks {
        slices
            .entry(position.z)
            .or_default()
            .insert(LayoutPosition::cube(position.as_2d()), block);
    }

    let mut merged = Vec::with_capacity(slices.len());
    for (z, slice) in &slices {
        let layers = merge_parallel_block_layers(slice)?;
        debug!(z, positions = slice.len(), layers = layers.len(), "Merged time slice");
        merged.push(Layer::sequenced(layers)?);
    }
    let root = Layer::sequenced(merged)?;

    info!(
        graph = graph.name(),
        cubes = graph.cubes().len(),
        slices = slices.len(),
        observables = readouts.len(),
        "Compiled block graph"
    );
    Ok(LayerTree::new(&root, readouts, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::standard::{StandardCubeBuilder, StandardPipeBuilder};
    use sc_03_layer_tree::{LayerNode, TreeError};

    fn p(x: i64, y: i64, z: i64) -> Position3D {
        Position3D::new(x, y, z)
    }

    fn compile(graph: &BlockGraph, observables: &[Position3D]) -> Result<LayerTree, AssemblyError> {
        compile_block_graph(
            graph,
            observables,
            &StandardCubeBuilder::default(),
            &StandardPipeBuilder::default(),
            AnnotationConfig::default(),
        )
    }

    fn memory(kind: &str) -> BlockGraph {
        let mut graph = BlockGraph::new(kind);
        graph.add_cube(p(0, 0, 0), kind.parse().unwrap()).unwrap();
        graph.add_cube(p(0, 0, 1), kind.parse().unwrap()).unwrap();
        graph.add_pipe(p(0, 0, 0), p(0, 0, 1)).unwrap();
        graph
    }

    #[test]
    fn test_open_ports_rejected() {
        let mut graph = BlockGraph::new("port");
        graph.add_cube(p(0, 0, 0), "PORT".parse().unwrap()).unwrap();
        graph.add_cube(p(0, 0, 1), "ZXZ".parse().unwrap()).unwrap();
        graph.add_pipe(p(0, 0, 0), p(0, 0, 1)).unwrap();
        assert!(matches!(
            compile(&graph, &[]),
            Err(AssemblyError::OpenPorts { count: 1 })
        ));
    }

    #[test]
    fn test_root_sequences_time_slices() {
        let tree = compile(&memory("ZXZ"), &[p(0, 0, 1)]).unwrap();
        let LayerNode::Sequence { children } = tree.root() else {
            panic!("expected a sequence");
        };
        assert_eq!(children.len(), 2);
        assert_eq!(tree.root().leaf_count(), 6);
        assert_eq!(tree.observables().len(), 1);
    }

    #[test]
    fn test_memory_experiment_detectors() {
        for kind in ["ZXZ", "ZXX", "XZX", "XZZ"] {
            let mut tree = compile(&memory(kind), &[p(0, 0, 1)]).unwrap();
            let circuit = tree.generate_circuit(1, true).unwrap();
            // (d^2 - 1) * 2 * d with d = 3.
            assert_eq!(circuit.num_detectors(), 48, "kind {kind}");
            assert_eq!(circuit.num_observables(), 1, "kind {kind}");
        }
    }

    #[test]
    fn test_negative_z_is_shifted() {
        let mut graph = BlockGraph::new("shifted");
        graph.add_cube(p(0, 0, -3), "ZXZ".parse().unwrap()).unwrap();
        let mut tree = compile(&graph, &[p(0, 0, -3)]).unwrap();
        assert_eq!(tree.generate_circuit(1, false).unwrap().num_detectors(), 24);
    }

    #[test]
    fn test_side_by_side_cubes_merge_into_one_stack() {
        let mut graph = BlockGraph::new("pair");
        graph.add_cube(p(0, 0, 0), "ZXZ".parse().unwrap()).unwrap();
        graph.add_cube(p(1, 0, 0), "ZXZ".parse().unwrap()).unwrap();
        graph.add_pipe(p(0, 0, 0), p(1, 0, 0)).unwrap();
        let mut tree = compile(&graph, &[]).unwrap();
        assert_eq!(tree.root().leaf_count(), 3);
        let circuit = tree.generate_circuit(1, false).unwrap();
        assert!(circuit.num_detectors() > 48);
    }

    #[test]
    fn test_negative_repetitions_surface_from_tree() {
        let mut tree = compile(&memory("ZXZ"), &[]).unwrap();
        assert!(matches!(
            tree.generate_circuit(0, true),
            Err(TreeError::NegativeRepetitions { .. })
        ));
    }
}
