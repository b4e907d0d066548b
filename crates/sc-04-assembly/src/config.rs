//! Configuration for the standard builders

use serde::{Deserialize, Serialize};
use shared_types::LinearFunction;

/// Standard cube and pipe builder configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardBuilderConfig {
    /// Number of memory rounds between the first and the last round of a
    /// cube, as a function of `k`
    pub memory_repetitions: LinearFunction,
}

impl Default for StandardBuilderConfig {
    fn default() -> Self {
        Self {
            memory_repetitions: LinearFunction::new(2, -1),
        }
    }
}
