//! # Spacetime Compiler Runtime
//!
//! Library side of the `compiler-runtime` binary.
//!
//! ## Modular Structure
//!
//! - `config/` - layered [`RuntimeConfig`] (defaults, TOML, `SC_*` variables)
//! - `pipeline/` - description to circuit, optional noise and distance check
//!
//! ## Flow
//!
//! ```text
//! graph.json ──GraphDescription──→ BlockGraph
//!     ──compile_block_graph──→ LayerTree
//!     ──generate_circuit(k)──→ Circuit ──NoiseModel──→ noisy Circuit
//! ```

pub mod config;
pub mod pipeline;

pub use config::{ConfigError, RuntimeConfig};
pub use pipeline::{compile_and_check, compile_description, CompiledCircuit};
