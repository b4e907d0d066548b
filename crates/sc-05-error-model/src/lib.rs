//! # SC-05: Error Model Subsystem
//!
//! Noise and decoding-graph analysis of compiled circuits.
//!
//! ## Architecture
//!
//! - **Domain**: [`NoiseModel`], [`DetectorErrorModel`] and its
//!   [`ErrorMechanism`]s
//! - **Algorithms**: Pauli-frame propagation of every noise component through
//!   the unrolled circuit, breadth-first search for the shortest graphlike
//!   logical error
//!
//! ## Usage
//!
//! ```text
//! noiseless circuit ──NoiseModel::apply──→ noisy circuit
//!     ──DetectorErrorModel::from_circuit──→ error model
//!     ──shortest_graphlike_error──→ circuit distance
//! ```

pub mod algorithms;
pub mod domain;

pub use domain::error_model::{DetectorErrorModel, ErrorMechanism};
pub use domain::errors::ErrorModelError;
pub use domain::noise::NoiseModel;
