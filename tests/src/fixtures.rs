//! Shared block graph fixtures

use compiler_runtime::{compile_description, RuntimeConfig};
use sc_04_assembly::GraphDescription;
use shared_types::Circuit;

/// Parse a JSON block graph description.
pub fn description(json: &str) -> GraphDescription {
    serde_json::from_str(json).expect("valid graph description")
}

/// A single cube of `kind` read out at the end.
pub fn single_cube(kind: &str) -> GraphDescription {
    description(&format!(
        r#"{{
            "name": "memory-{kind}",
            "cubes": [{{ "position": [0, 0, 0], "kind": "{kind}" }}],
            "observables": [[0, 0, 0]]
        }}"#
    ))
}

/// `height` cubes of `kind` stacked in time, read out at the top.
pub fn temporal_stack(kind: &str, height: i64) -> GraphDescription {
    let cubes: Vec<String> = (0..height)
        .map(|z| format!(r#"{{ "position": [0, 0, {z}], "kind": "{kind}" }}"#))
        .collect();
    let pipes: Vec<String> = (1..height)
        .map(|z| format!(r#"{{ "u": [0, 0, {}], "v": [0, 0, {z}] }}"#, z - 1))
        .collect();
    description(&format!(
        r#"{{
            "name": "stack-{kind}",
            "cubes": [{}],
            "pipes": [{}],
            "observables": [[0, 0, {}]]
        }}"#,
        cubes.join(", "),
        pipes.join(", "),
        height - 1
    ))
}

/// Compile with the default configuration.
pub fn compile(description: &GraphDescription, k: u32) -> Circuit {
    compile_description(description, k, &RuntimeConfig::default()).expect("compilation succeeds")
}
