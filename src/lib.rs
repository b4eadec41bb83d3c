//! # weighted-tree: random weighted trees with lazy views
//!
//! This library synthesizes randomly-weighted rooted trees, converts them to
//! and from flat edge lists, finds the maximum-weight root-to-leaf path, and
//! maintains a lazily expanded view of a tree for a rendering front end.
//!
//! ## Features
//!
//! - **Generation**: controllable depth, branching factor and weight range,
//!   reproducible through an injected random source
//! - **Edge lists**: `from_edges` / `to_edges` with order-preserving round trips
//! - **Analysis**: single-pass max-weight path search
//! - **Views**: persistent, structurally shared visible trees with a
//!   `Leaf | Collapsed | Expanded` state per node

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Tree data model: node ids, nodes, edges and the ancestor index
pub mod tree;

/// Random tree synthesis
pub mod generation;

/// Edge-list conversion and graph export
pub mod edges;

/// Path analysis over full trees
pub mod analysis;

/// Lazily expanded views for renderers
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use tree::{Edge, Node, NodeId, Tree, Weight};
pub use generation::{GenerationParams, TreeGenerator, WeightRange};
pub use edges::{from_edges, to_edges};
pub use analysis::{max_weight_path, MaxPathResult};
pub use view::{Expansion, LazyExpansionController, VisibleTree};

/// Error types for the library
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// Malformed generation or configuration input
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Analysis or view construction on a tree without nodes
    #[error("Tree is empty")]
    EmptyTree,

    /// Edge list without exactly one node that is never a destination
    #[error("Ambiguous root: {} candidate(s) {:?}", .candidates.len(), .candidates)]
    AmbiguousRoot {
        /// Nodes that never appear as a destination, in first-seen order
        candidates: Vec<NodeId>,
    },

    /// Node id absent from the full tree
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Structurally invalid tree or edge list: multiple parents, unreachable
    /// nodes, a weighted root, excessive depth or overflowing path weights
    #[error("Invalid tree: {0}")]
    InvalidTree(String),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for the library
pub type Result<T> = std::result::Result<T, TreeError>;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        analysis::{max_weight_path, root_to_leaf_paths, MaxPathResult},
        edges::{from_edges, to_digraph, to_edges},
        generation::{GenerationParams, TreeGenerator, WeightRange},
        tree::{Edge, Node, NodeId, Tree, TreeStats, Weight, MAX_DEPTH},
        view::{
            ExpandOutcome, Expansion, ExpansionConfig, LazyExpansionController, Revealed,
            RevealPolicy, SharedExpansionController, VisibleNode, VisibleRef, VisibleTree,
        },
        Result, TreeError,
    };
}
