//! Random weighted tree synthesis

mod params;
mod generator;

pub use params::{GenerationParams, WeightRange, DEFAULT_MAX_NODES};
pub use generator::{generate_batch, TreeGenerator};
