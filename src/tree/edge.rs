//! Flat parent-to-child edge records

use super::{NodeId, Weight};
use serde::{Serialize, Deserialize};

/// One parent-to-child relationship of the edge-list representation.
///
/// `parent_label` is `None` for edges leaving the root and the source id
/// otherwise.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Parent node
    pub source: NodeId,
    /// Child node
    pub destination: NodeId,
    /// Weight of the edge
    pub weight: Weight,
    /// Parent label carried for renderers
    #[serde(default)]
    pub parent_label: Option<NodeId>,
}

impl Edge {
    /// Create an edge, deriving `parent_label` from whether `source` is the root
    pub fn new(source: NodeId, destination: NodeId, weight: Weight, source_is_root: bool) -> Self {
        let parent_label = if source_is_root { None } else { Some(source.clone()) };
        Edge {
            source,
            destination,
            weight,
            parent_label,
        }
    }
}
