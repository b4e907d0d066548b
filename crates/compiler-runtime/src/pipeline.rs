//! # Compilation Pipeline
//!
//! Description → block graph → layer tree → circuit, with optional noise and
//! a distance check of the noisy circuit.

use anyhow::{Context, Result};
use sc_04_assembly::{
    compile_block_graph, GraphDescription, StandardCubeBuilder, StandardPipeBuilder,
};
use sc_05_error_model::{DetectorErrorModel, NoiseModel};
use shared_types::Circuit;
use tracing::info;

use crate::config::RuntimeConfig;

/// Output of one compilation.
#[derive(Clone, Debug)]
pub struct CompiledCircuit {
    pub circuit: Circuit,
    /// Weight of the shortest undetectable logical error, when requested on
    /// a noisy circuit.
    pub distance: Option<usize>,
}

/// Compile `description` at scale `k`, adding noise when the configuration
/// sets a strength.
pub fn compile_description(
    description: &GraphDescription,
    k: u32,
    config: &RuntimeConfig,
) -> Result<Circuit> {
    let graph = description
        .to_graph()
        .context("Invalid block graph description")?;
    let cube_builder = StandardCubeBuilder::new(config.builder.clone());
    let pipe_builder = StandardPipeBuilder::new(config.builder.clone());

    let mut tree = compile_block_graph(
        &graph,
        &description.observable_positions(),
        &cube_builder,
        &pipe_builder,
        config.annotation.clone(),
    )
    .with_context(|| format!("Failed to compile block graph '{}'", description.name))?;
    let circuit = tree
        .generate_circuit(k, config.include_qubit_coords)
        .with_context(|| format!("Failed to generate the circuit at k = {k}"))?;

    let Some(p) = config.noise else {
        return Ok(circuit);
    };
    NoiseModel::uniform_depolarizing(p)
        .apply(&circuit)
        .context("Failed to add noise")
}

/// Compile and, when `check_distance` is set on a noisy circuit, compute
/// the shortest graphlike logical error.
pub fn compile_and_check(
    description: &GraphDescription,
    k: u32,
    config: &RuntimeConfig,
    check_distance: bool,
) -> Result<CompiledCircuit> {
    let circuit = compile_description(description, k, config)?;
    let distance = if check_distance && config.noise.is_some() {
        let model = DetectorErrorModel::from_circuit(&circuit)
            .context("Failed to extract the detector error model")?;
        let distance = model.shortest_graphlike_error().map(|error| error.len());
        info!(
            detectors = model.num_detectors(),
            errors = model.errors().len(),
            distance = ?distance,
            "Analysed detector error model"
        );
        distance
    } else {
        None
    };
    Ok(CompiledCircuit { circuit, distance })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::Instruction;

    fn memory() -> GraphDescription {
        serde_json::from_str(
            r#"{
                "name": "memory",
                "cubes": [{ "position": [0, 0, 0], "kind": "ZXZ" }],
                "observables": [[0, 0, 0]]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_compile_memory() {
        let circuit = compile_description(&memory(), 1, &RuntimeConfig::default()).unwrap();
        assert_eq!(circuit.num_detectors(), 24);
        assert_eq!(circuit.num_observables(), 1);
        assert!(matches!(
            circuit.instructions()[0],
            Instruction::QubitCoords { .. }
        ));
    }

    #[test]
    fn test_noise_from_config() {
        let config = RuntimeConfig {
            noise: Some(0.001),
            include_qubit_coords: false,
            ..RuntimeConfig::default()
        };
        let circuit = compile_description(&memory(), 1, &config).unwrap();
        assert!(circuit
            .flattened()
            .instructions()
            .iter()
            .any(|instruction| matches!(instruction, Instruction::Noise { .. })));
    }

    #[test]
    fn test_distance_requires_noise() {
        let compiled = compile_and_check(&memory(), 1, &RuntimeConfig::default(), true).unwrap();
        assert_eq!(compiled.distance, None);
    }

    #[test]
    fn test_invalid_description() {
        let description = GraphDescription {
            cubes: vec![sc_04_assembly::CubeDescription {
                position: [0, 0, 0],
                kind: "ZZZ".to_string(),
                label: None,
            }],
            ..GraphDescription::default()
        };
        let error = compile_description(&description, 1, &RuntimeConfig::default()).unwrap_err();
        assert!(error.to_string().contains("Invalid block graph description"));
    }
}
