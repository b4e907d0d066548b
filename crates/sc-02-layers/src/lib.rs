//! # SC-02: Layers Subsystem
//!
//! Scale-parameterised temporal stacks of operations and the engine that
//! merges the stacks of every layout position into one global stack.
//!
//! ## Architecture
//!
//! - **Domain**: atomic layers ([`PlaquetteLayer`], [`LayoutLayer`]), composed
//!   layers ([`SequencedLayers`], [`RepeatedLayer`]), [`Block`] and
//!   [`LayoutPosition`], with the invariants they enforce at construction
//! - **Algorithms**: [`merge_parallel_block_layers`]
//!
//! ## Invariants
//!
//! - A repeated layer never has both a scaling body and a scaling repetition
//!   count, so every timestep count stays linear in `k`.
//! - Layers are immutable values. Trimming and merging build new layers.
//! - Layout layers are only produced by the merge engine and are never empty.

pub mod algorithms;
pub mod domain;

pub use algorithms::merge::merge_parallel_block_layers;
pub use domain::atomic::{AtomicLayer, PlaquetteLayer};
pub use domain::block::Block;
pub use domain::composed::{ComposedLayer, Layer, RepeatedLayer, SequencedLayers, TemporalBorder};
pub use domain::errors::LayerError;
pub use domain::layout::{LayoutLayer, LayoutPosition};
