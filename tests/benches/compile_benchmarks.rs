//! # Spacetime Compiler Benchmarks
//!
//! | Stage | Input | Scales |
//! |-------|-------|--------|
//! | Compile + generate | single memory cube | k = 1..=4 |
//! | Generate only | two-cube stack, tree reused | k = 1..=4 |
//! | Error model | noisy single cube | k = 1, 2 |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

use compiler_runtime::{compile_description, RuntimeConfig};
use sc_03_layer_tree::AnnotationConfig;
use sc_04_assembly::{
    compile_block_graph, GraphDescription, StandardBuilderConfig, StandardCubeBuilder,
    StandardPipeBuilder,
};
use sc_05_error_model::DetectorErrorModel;

const SINGLE_CUBE: &str = r#"{
    "name": "memory",
    "cubes": [{ "position": [0, 0, 0], "kind": "ZXZ" }],
    "observables": [[0, 0, 0]]
}"#;

const STACK: &str = r#"{
    "name": "stack",
    "cubes": [
        { "position": [0, 0, 0], "kind": "ZXZ" },
        { "position": [0, 0, 1], "kind": "ZXZ" }
    ],
    "pipes": [{ "u": [0, 0, 0], "v": [0, 0, 1] }],
    "observables": [[0, 0, 1]]
}"#;

fn description(json: &str) -> GraphDescription {
    serde_json::from_str(json).expect("valid description")
}

// ============================================================================
// Full compilation
// ============================================================================

fn bench_compile_single_cube(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile-single-cube");
    group.measurement_time(Duration::from_secs(5));
    let graph = description(SINGLE_CUBE);
    let config = RuntimeConfig::default();

    for k in 1..=4u32 {
        group.bench_with_input(BenchmarkId::from_parameter(k), &k, |b, &k| {
            b.iter(|| black_box(compile_description(&graph, k, &config).expect("compiles")))
        });
    }
    group.finish();
}

// ============================================================================
// Circuit generation on a prepared tree
// ============================================================================

fn bench_generate_with_database(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate-stack");
    let graph = description(STACK);
    let block_graph = graph.to_graph().expect("valid graph");
    let builder = StandardBuilderConfig::default();

    for use_detector_database in [false, true] {
        let annotation = AnnotationConfig {
            use_detector_database,
            ..AnnotationConfig::default()
        };
        for k in 1..=4u32 {
            let id = BenchmarkId::new(format!("database={use_detector_database}"), k);
            group.bench_with_input(id, &k, |b, &k| {
                b.iter(|| {
                    let mut tree = compile_block_graph(
                        &block_graph,
                        &graph.observable_positions(),
                        &StandardCubeBuilder::new(builder.clone()),
                        &StandardPipeBuilder::new(builder.clone()),
                        annotation.clone(),
                    )
                    .expect("compiles");
                    black_box(tree.generate_circuit(k, false).expect("generates"))
                })
            });
        }
    }
    group.finish();
}

// ============================================================================
// Detector error model extraction
// ============================================================================

fn bench_error_model(c: &mut Criterion) {
    let mut group = c.benchmark_group("error-model");
    group.sample_size(10);
    let graph = description(SINGLE_CUBE);
    let config = RuntimeConfig {
        noise: Some(0.001),
        include_qubit_coords: false,
        ..RuntimeConfig::default()
    };

    for k in 1..=2u32 {
        let circuit = compile_description(&graph, k, &config).expect("compiles");
        group.bench_with_input(BenchmarkId::from_parameter(k), &circuit, |b, circuit| {
            b.iter(|| {
                let model = DetectorErrorModel::from_circuit(circuit).expect("valid circuit");
                black_box(model.shortest_graphlike_error())
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_compile_single_cube,
    bench_generate_with_database,
    bench_error_model
);
criterion_main!(benches);
