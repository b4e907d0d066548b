//! Domain layer for the layer model
//!
//! Atomic layers, their temporal compositions, blocks and layout positions.

pub mod atomic;
pub mod block;
pub mod composed;
pub mod errors;
pub mod invariants;
pub mod layout;
