//! Application layer for the layer tree

pub mod tree;
