//! Adapters for the layer tree

pub mod detector_database;
