//! # Runtime Configuration
//!
//! Layered configuration of the compiler binary. Sources are applied in
//! order, each overriding the previous one:
//!
//! 1. built-in defaults,
//! 2. an optional TOML file,
//! 3. `SC_*` environment variables,
//! 4. command line flags (applied by the binary).
//!
//! ```toml
//! log_level = "debug"
//! include_qubit_coords = false
//! noise = 0.001
//!
//! [annotation]
//! manhattan_radius = 2
//! use_detector_database = true
//!
//! [builder]
//! memory_repetitions = { slope = 2, offset = -1 }
//! ```

use std::path::Path;

use sc_03_layer_tree::AnnotationConfig;
use sc_04_assembly::StandardBuilderConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment variable holds a value of the wrong type
    #[error("Invalid value '{value}' for {variable}")]
    InvalidOverride { variable: String, value: String },
}

/// Complete compiler configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Default log filter, used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Emit a `QUBIT_COORDS` line per qubit.
    pub include_qubit_coords: bool,
    /// Uniform depolarizing strength added to the output circuit.
    pub noise: Option<f64>,
    /// Detector annotation settings.
    pub annotation: AnnotationConfig,
    /// Standard cube and pipe builder settings.
    pub builder: StandardBuilderConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            include_qubit_coords: true,
            noise: None,
            annotation: AnnotationConfig::default(),
            builder: StandardBuilderConfig::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Defaults, overridden by the file at `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Apply the `SC_*` variables returned by `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("SC_LOG_LEVEL") {
            self.log_level = level;
        }
        let radius = parse_override(&lookup, "SC_MANHATTAN_RADIUS", |v| v.parse::<u64>().ok())?;
        if let Some(radius) = radius {
            self.annotation.manhattan_radius = radius;
        }
        if let Some(enabled) = parse_override(&lookup, "SC_USE_DETECTOR_DATABASE", parse_bool)? {
            self.annotation.use_detector_database = enabled;
        }
        if let Some(enabled) = parse_override(&lookup, "SC_INCLUDE_QUBIT_COORDS", parse_bool)? {
            self.include_qubit_coords = enabled;
        }
        let noise = parse_override(&lookup, "SC_NOISE", |v| v.parse::<f64>().ok())?;
        if let Some(noise) = noise {
            self.noise = Some(noise);
        }
        Ok(self)
    }

    /// Apply the `SC_*` variables of the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|name| std::env::var(name).ok())
    }
}

fn parse_override<T, F, P>(lookup: &F, variable: &str, parse: P) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Option<T>,
{
    let Some(value) = lookup(variable) else {
        return Ok(None);
    };
    parse(value.trim())
        .map(Some)
        .ok_or_else(|| ConfigError::InvalidOverride {
            variable: variable.to_string(),
            value,
        })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::LinearFunction;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = RuntimeConfig::default();
        assert_eq!(config.log_level, "info");
        assert!(config.include_qubit_coords);
        assert_eq!(config.noise, None);
        assert_eq!(config.annotation, AnnotationConfig::default());
    }

    #[test]
    fn test_parse_toml() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            include_qubit_coords = false
            noise = 0.001

            [annotation]
            manhattan_radius = 3

            [builder]
            memory_repetitions = { slope = 2, offset = 1 }
            "#,
        )
        .unwrap();
        assert!(!config.include_qubit_coords);
        assert_eq!(config.noise, Some(0.001));
        assert_eq!(config.annotation.manhattan_radius, 3);
        assert!(config.annotation.use_detector_database);
        assert_eq!(config.builder.memory_repetitions, LinearFunction::new(2, 1));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            RuntimeConfig::from_toml_str("noise = \"high\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = RuntimeConfig::load(Some(Path::new("/nonexistent/sc.toml")));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
        assert_eq!(RuntimeConfig::load(None).unwrap(), RuntimeConfig::default());
    }

    #[test]
    fn test_environment_overrides() {
        let config = RuntimeConfig::default()
            .with_overrides(env(&[
                ("SC_LOG_LEVEL", "debug"),
                ("SC_MANHATTAN_RADIUS", "4"),
                ("SC_USE_DETECTOR_DATABASE", "false"),
                ("SC_NOISE", "0.01"),
            ]))
            .unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.annotation.manhattan_radius, 4);
        assert!(!config.annotation.use_detector_database);
        assert_eq!(config.noise, Some(0.01));
        assert!(config.include_qubit_coords);
    }

    #[test]
    fn test_invalid_override() {
        let result =
            RuntimeConfig::default().with_overrides(env(&[("SC_MANHATTAN_RADIUS", "two")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidOverride { variable, .. }) if variable == "SC_MANHATTAN_RADIUS"
        ));
    }
}
