//! Ports for the Layer Tree Subsystem

pub mod walker;

pub use walker::NodeWalker;
