//! Tree data model shared by every other module

mod node;
mod edge;
mod index;
mod rooted;

pub use node::{Node, NodeId, Weight};
pub use edge::Edge;
pub use index::AncestorIndex;
pub use rooted::{Tree, TreeStats, MAX_DEPTH};
pub(crate) use rooted::EdgeLayout;
