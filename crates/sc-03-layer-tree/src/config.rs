//! Configuration for the Layer Tree Subsystem

use serde::{Deserialize, Serialize};

/// Detector annotation configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Largest Manhattan distance, in plaquettes, between a plaquette and the
    /// previous-layer plaquettes its detectors may involve
    pub manhattan_radius: u64,
    /// Cache detectors by fingerprint of their local pattern
    pub use_detector_database: bool,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            manhattan_radius: 2,
            use_detector_database: true,
        }
    }
}
