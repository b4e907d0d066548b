//! # End-to-End Memory Experiments
//!
//! Compiled memory circuits under noise: the detector error model (sc-05)
//! must see the full code distance, `2k + 1`, in every orientation.

#[cfg(test)]
mod tests {
    use compiler_runtime::{compile_and_check, RuntimeConfig};
    use sc_05_error_model::{DetectorErrorModel, NoiseModel};

    use crate::fixtures::{compile, single_cube, temporal_stack};

    const P: f64 = 0.001;

    fn distance(model: &DetectorErrorModel) -> Option<usize> {
        model.shortest_graphlike_error().map(|error| error.len())
    }

    // =============================================================================
    // INTEGRATION TESTS: NOISELESS CIRCUITS
    // =============================================================================

    #[test]
    fn test_noiseless_circuit_has_no_errors() {
        let model = DetectorErrorModel::from_circuit(&compile(&single_cube("ZXZ"), 1)).unwrap();
        assert_eq!(model.num_detectors(), 24);
        assert_eq!(model.num_observables(), 1);
        assert!(model.errors().is_empty());
        assert_eq!(distance(&model), None);
    }

    // =============================================================================
    // INTEGRATION TESTS: CIRCUIT DISTANCE
    // =============================================================================

    #[test]
    fn test_memory_distance_in_every_orientation() {
        for kind in ["ZXZ", "ZXX", "XZX", "XZZ"] {
            let noisy = NoiseModel::uniform_depolarizing(P)
                .apply(&compile(&single_cube(kind), 1))
                .unwrap();
            let model = DetectorErrorModel::from_circuit(&noisy).unwrap();
            assert_eq!(model.num_detectors(), 24, "kind {kind}");
            assert_eq!(distance(&model), Some(3), "kind {kind}");
        }
    }

    #[test]
    fn test_stacked_memory_distance() {
        let noisy = NoiseModel::uniform_depolarizing(P)
            .apply(&compile(&temporal_stack("ZXZ", 2), 1))
            .unwrap();
        let model = DetectorErrorModel::from_circuit(&noisy).unwrap();
        assert_eq!(model.num_detectors(), 48);
        assert_eq!(distance(&model), Some(3));
    }

    #[test]
    fn test_measurement_noise_is_graphlike() {
        let noisy = NoiseModel::before_measure_flip(P)
            .apply(&compile(&single_cube("XZZ"), 1))
            .unwrap();
        let model = DetectorErrorModel::from_circuit(&noisy).unwrap();
        assert!(!model.errors().is_empty());
        assert!(model.errors().iter().all(|error| error.is_graphlike()));
        assert_eq!(distance(&model), Some(3));
    }

    #[test]
    fn test_runtime_reports_distance() {
        let config = RuntimeConfig {
            noise: Some(P),
            ..RuntimeConfig::default()
        };
        let compiled = compile_and_check(&single_cube("ZXZ"), 1, &config, true).unwrap();
        assert_eq!(compiled.distance, Some(3));
        assert_eq!(compiled.circuit.num_detectors(), 24);
    }
}
