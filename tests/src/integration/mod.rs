//! # Integration Tests
//!
//! Flows crossing several subsystems, from a block graph description down to
//! the detector error model of the noisy circuit.

pub mod assembly_flows;
pub mod e2e_memory;
pub mod merge_properties;
