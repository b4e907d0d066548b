pub mod error_model;
pub mod errors;
pub mod noise;
