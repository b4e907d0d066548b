//! Application layer for the Assembly Subsystem

pub mod compile;
