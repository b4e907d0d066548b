//! # Assembly Flows
//!
//! Block graph descriptions compiled through assembly (sc-04), the merge
//! engine (sc-02) and the layer tree (sc-03).
//!
//! ## Flows Tested:
//!
//! 1. **Memory**: single cubes and temporal stacks, at several scales
//! 2. **Spatial pipes**: two cubes fused into one wider patch
//! 3. **Rejections**: graphs the standard builders cannot compile

#[cfg(test)]
mod tests {
    use sc_03_layer_tree::{AnnotationConfig, LayerTree};
    use sc_04_assembly::{
        compile_block_graph, AssemblyError, GraphDescription, StandardBuilderConfig,
        StandardCubeBuilder, StandardPipeBuilder,
    };
    use shared_types::{Circuit, Instruction};

    use crate::fixtures::{compile, description, single_cube, temporal_stack};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn try_compile(description: &GraphDescription) -> Result<LayerTree, AssemblyError> {
        let graph = description.to_graph()?;
        let config = StandardBuilderConfig::default();
        compile_block_graph(
            &graph,
            &description.observable_positions(),
            &StandardCubeBuilder::new(config.clone()),
            &StandardPipeBuilder::new(config),
            AnnotationConfig::default(),
        )
    }

    fn qubit_count(circuit: &Circuit) -> usize {
        circuit
            .instructions()
            .iter()
            .filter(|instruction| matches!(instruction, Instruction::QubitCoords { .. }))
            .count()
    }

    fn pair(kind: &str, v: [i64; 3], observables: &str) -> GraphDescription {
        description(&format!(
            r#"{{
                "name": "pair",
                "cubes": [
                    {{ "position": [0, 0, 0], "kind": "{kind}" }},
                    {{ "position": {v:?}, "kind": "{kind}" }}
                ],
                "pipes": [{{ "u": [0, 0, 0], "v": {v:?} }}],
                "observables": {observables}
            }}"#
        ))
    }

    // =============================================================================
    // INTEGRATION TESTS: MEMORY
    // =============================================================================

    #[test]
    fn test_single_cube_scales_with_k() {
        let graph = single_cube("ZXZ");
        let small = compile(&graph, 1);
        assert_eq!(small.num_detectors(), 24);
        assert_eq!(small.num_measurements(), 33);
        assert_eq!(qubit_count(&small), 17);

        let large = compile(&graph, 2);
        assert_eq!(large.num_detectors(), 120);
        assert_eq!(qubit_count(&large), 49);
        assert!(large
            .instructions()
            .iter()
            .any(|instruction| matches!(instruction, Instruction::Repeat { count: 3, .. })));
    }

    #[test]
    fn test_every_memory_orientation_compiles() {
        for kind in ["ZXZ", "ZXX", "XZX", "XZZ"] {
            let circuit = compile(&single_cube(kind), 1);
            assert_eq!(circuit.num_detectors(), 24, "kind {kind}");
            assert_eq!(circuit.num_observables(), 1, "kind {kind}");
        }
    }

    #[test]
    fn test_temporal_stack() {
        // Nine rounds of eight stabilizers, plus the four stabilizers fixed
        // by the initial reset and the four read by the final measurement.
        let circuit = compile(&temporal_stack("ZXZ", 3), 1);
        assert_eq!(circuit.num_detectors(), 4 + 8 * 8 + 4);
        assert_eq!(circuit.num_measurements(), 9 * 8 + 9);
        assert_eq!(qubit_count(&circuit), 17);
    }

    #[test]
    fn test_stack_tree_shape() {
        let tree = try_compile(&temporal_stack("XZX", 3)).unwrap();
        // Three slices of [first round, repeated rounds, last round].
        assert_eq!(tree.root().leaf_count(), 9);
        assert_eq!(tree.observables().len(), 1);
    }

    // =============================================================================
    // INTEGRATION TESTS: SPATIAL PIPES
    // =============================================================================

    #[test]
    fn test_cubes_joined_along_x() {
        // One 7 x 3 patch: 21 data qubits and 20 stabilizers, 8 of them Z.
        let circuit = compile(&pair("ZXZ", [1, 0, 0], "[]"), 1);
        assert_eq!(qubit_count(&circuit), 41);
        assert_eq!(circuit.num_measurements(), 3 * 20 + 21);
        assert_eq!(circuit.num_detectors(), 8 + 2 * 20 + 8);
    }

    #[test]
    fn test_cubes_joined_along_y() {
        // One 3 x 7 patch: 12 of its 20 stabilizers are Z.
        let circuit = compile(&pair("ZXZ", [0, 1, 0], "[[0, 1, 0]]"), 1);
        assert_eq!(qubit_count(&circuit), 41);
        assert_eq!(circuit.num_detectors(), 12 + 2 * 20 + 12);
        assert_eq!(circuit.num_observables(), 1);
    }

    #[test]
    fn test_joined_cubes_share_one_stack() {
        let tree = try_compile(&pair("XZZ", [1, 0, 0], "[]")).unwrap();
        assert_eq!(tree.root().leaf_count(), 3);
    }

    // =============================================================================
    // INTEGRATION TESTS: REJECTIONS
    // =============================================================================

    #[test]
    fn test_open_port_rejected() {
        let graph = description(
            r#"{
                "cubes": [
                    { "position": [0, 0, 0], "kind": "ZXZ" },
                    { "position": [0, 0, 1], "kind": "PORT", "label": "out" }
                ],
                "pipes": [{ "u": [0, 0, 0], "v": [0, 0, 1] }]
            }"#,
        );
        assert!(matches!(
            try_compile(&graph),
            Err(AssemblyError::OpenPorts { count: 1 })
        ));
    }

    #[test]
    fn test_spatial_junction_unsupported() {
        assert!(matches!(
            try_compile(&single_cube("XXZ")),
            Err(AssemblyError::Unsupported(_))
        ));
    }

    #[test]
    fn test_mismatched_pipe_bases_rejected() {
        let graph = description(
            r#"{
                "cubes": [
                    { "position": [0, 0, 0], "kind": "ZXZ" },
                    { "position": [1, 0, 0], "kind": "XZZ" }
                ],
                "pipes": [{ "u": [0, 0, 0], "v": [1, 0, 0] }]
            }"#,
        );
        assert!(matches!(
            try_compile(&graph),
            Err(AssemblyError::InvalidGraph(_))
        ));
    }

    #[test]
    fn test_readout_must_be_final() {
        let mut graph = temporal_stack("ZXZ", 2);
        graph.observables = vec![[0, 0, 0]];
        assert!(matches!(
            try_compile(&graph),
            Err(AssemblyError::ReadoutNotFinal { final_z: 1, .. })
        ));
    }
}
