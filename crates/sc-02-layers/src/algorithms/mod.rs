//! Algorithms for the layer model

pub mod merge;
