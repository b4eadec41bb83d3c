//! Node identifiers and immutable tree nodes

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use serde::{Serialize, Deserialize};

/// Edge weight. The root carries weight 0.
pub type Weight = i64;

/// Unique identifier of a tree node
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a node id from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    /// Borrow the id text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        NodeId(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        NodeId(id)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A node of an immutable tree.
///
/// `weight` is the weight of the edge from this node's parent. Children are
/// held behind `Arc` so views and subtrees can share them without copying.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    #[serde(default)]
    weight: Weight,
    #[serde(default)]
    children: Vec<Arc<Node>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, serde_json::Value>,
}

impl Node {
    /// Create a node without children
    pub fn leaf(id: impl Into<NodeId>, weight: Weight) -> Self {
        Node {
            id: id.into(),
            weight,
            children: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Create a root node (weight 0) without children
    pub fn root(id: impl Into<NodeId>) -> Self {
        Self::leaf(id, 0)
    }

    /// Create a node with the given children, in order
    pub fn with_children(id: impl Into<NodeId>, weight: Weight, children: Vec<Node>) -> Self {
        Node {
            id: id.into(),
            weight,
            children: children.into_iter().map(Arc::new).collect(),
            attributes: BTreeMap::new(),
        }
    }

    /// Create a node from already shared children
    pub fn from_shared(id: NodeId, weight: Weight, children: Vec<Arc<Node>>) -> Self {
        Node {
            id,
            weight,
            children,
            attributes: BTreeMap::new(),
        }
    }

    /// Append a child
    pub fn push_child(&mut self, child: Node) -> &mut Self {
        self.children.push(Arc::new(child));
        self
    }

    /// Attach an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Node id
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// Weight of the edge from the parent
    pub fn weight(&self) -> Weight {
        self.weight
    }

    /// Ordered children
    pub fn children(&self) -> &[Arc<Node>] {
        &self.children
    }

    /// Optional renderer attributes
    pub fn attributes(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.attributes
    }

    /// True when the node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in the subtree rooted here
    pub fn subtree_size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter().map(|child| &**child));
        }
        count
    }
}

// Unlinks uniquely owned descendants one at a time so long chains do not
// recurse through nested drops.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(child) = pending.pop() {
            if let Ok(mut child) = Arc::try_unwrap(child) {
                pending.append(&mut child.children);
            }
        }
    }
}
