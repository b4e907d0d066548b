//! Algorithms of the layer tree

pub mod emission;
pub mod flows;
pub mod walkers;
