pub mod distance;
pub mod propagation;
