//! # Shared Types Crate
//!
//! Types shared by every subsystem of the spacetime compiler.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: scalable quantities, positions, qubits and the
//!   circuit model are defined once, here.
//! - **Symbolic until instantiated**: every size and repetition count is a
//!   [`LinearFunction`] of the scale parameter `k` and is only evaluated when a
//!   concrete circuit is requested.
//! - **Stim-compatible output**: [`Circuit`] renders to the text format used by
//!   stabilizer simulators.

pub mod basis;
pub mod circuit;
pub mod errors;
pub mod position;
pub mod qubit;
pub mod scale;

pub use basis::{Basis, ExtendedBasis};
pub use circuit::{Circuit, Gate, Instruction, NoiseChannel};
pub use errors::{QubitMapError, ScaleError};
pub use position::{Direction3D, Position2D, Position3D, Shape2D, Shift2D};
pub use qubit::{GridQubit, QubitMap};
pub use scale::{LinearFunction, Scalable2D};
