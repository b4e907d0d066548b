//! Domain layer for plaquettes

pub mod errors;
pub mod plaquettes;
pub mod rpng;
pub mod template;
