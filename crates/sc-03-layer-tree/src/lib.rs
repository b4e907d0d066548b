//! # SC-03: Layer Tree Subsystem
//!
//! Turns the merged layer stack into a concrete circuit at any scale `k`.
//!
//! ## Architecture
//!
//! - **Domain**: tree nodes with stable leaf identifiers, per-scale
//!   annotations, detectors and logical observables
//! - **Ports**: the [`NodeWalker`] traversal interface
//! - **Algorithms**: flow-based detector computation, the annotation walkers
//!   and circuit emission
//! - **Adapters**: the fingerprint-keyed detector database
//! - **Application**: [`LayerTree`], memoizing annotations per `k`
//!
//! ## Detector annotation
//!
//! Detectors compare a plaquette's syndrome measurement with the outgoing
//! stabilizer flows of the previous leaf, looking no further than
//! `manhattan_radius` plaquettes away. Leaves inside a repetition are
//! annotated twice: once after their real predecessor and once after the
//! last leaf of the repeated body.

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use adapters::detector_database::{fingerprint, DetectorDatabase, Fingerprint};
pub use algorithms::flows::{compute_detectors, CornerBoundary, LocalPattern, PlaquetteBoundary};
pub use application::tree::LayerTree;
pub use config::AnnotationConfig;
pub use domain::annotations::{LeafAnnotations, LeafBoundary, MeasurementRecord, TreeAnnotations};
pub use domain::detectors::{Detector, LeafSide, MeasurementRef, RelativeDetector};
pub use domain::errors::TreeError;
pub use domain::node::{LayerNode, LeafId, MergedLayer, PlacedLayer};
pub use domain::observables::{AbstractObservable, ScalableLine};
pub use ports::NodeWalker;
