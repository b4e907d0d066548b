//! Domain layer for block graph assembly

pub mod description;
pub mod errors;
pub mod graph;
pub mod invariants;
pub mod specs;
