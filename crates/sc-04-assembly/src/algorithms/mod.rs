//! Algorithms of the Assembly Subsystem

pub mod assembly;
pub mod readout;
