//! Edge-list representation of trees

mod conversion;
mod export;

pub use conversion::{from_edges, to_edges};
pub use export::to_digraph;
