//! Algorithms for the plaquettes subsystem

pub mod generation;
