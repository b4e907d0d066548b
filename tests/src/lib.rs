//! # Spacetime Compiler Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/     # Cross-subsystem flows
//! │   ├── merge_properties.rs   # Property tests of the merge engine
//! │   ├── assembly_flows.rs     # Block graph descriptions to layer trees
//! │   └── e2e_memory.rs         # Noisy circuits, error models and distance
//! │
//! └── benches/             # Criterion benchmarks
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p sc-tests
//!
//! # By category
//! cargo test -p sc-tests integration::e2e_memory::
//!
//! # Benchmarks
//! cargo bench -p sc-tests
//! ```

#[cfg(test)]
pub mod fixtures;
pub mod integration;
