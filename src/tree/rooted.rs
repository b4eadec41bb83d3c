//! Rooted, immutable trees with an ancestor index

use std::fmt;
use std::sync::Arc;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use super::{AncestorIndex, Node, NodeId};
use crate::{Result, TreeError};

/// Deepest node depth a tree may have; the root is at depth 0
pub const MAX_DEPTH: usize = 1024;

/// Destination and parent label of every edge, in edge-list order
pub(crate) type EdgeLayout = Arc<[(NodeId, Option<NodeId>)]>;

/// A rooted, acyclic tree of uniquely identified nodes.
///
/// - The tree is immutable once built and shares its nodes through `Arc`
/// - Every node id is indexed with its positional path from the root
/// - The root carries weight 0 and no node is deeper than [`MAX_DEPTH`]
/// - The empty tree has no root and is only useful as a placeholder
#[derive(Clone)]
pub struct Tree {
    root: Option<Arc<Node>>,
    index: AncestorIndex,
    edge_layout: Option<EdgeLayout>,
}

/// Summary counts of a tree
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Total number of nodes
    pub node_count: usize,
    /// Nodes without children
    pub leaf_count: usize,
    /// Edges on the longest root-to-leaf path
    pub max_depth: usize,
}

impl Tree {
    /// Create a tree from its root node
    pub fn new(root: Node) -> Result<Self> {
        Self::from_shared(Arc::new(root))
    }

    /// Create a tree from an already shared root node.
    ///
    /// Fails with `InvalidTree` on duplicate ids, a root with non-zero weight,
    /// or nodes deeper than [`MAX_DEPTH`].
    pub fn from_shared(root: Arc<Node>) -> Result<Self> {
        if root.weight() != 0 {
            return Err(TreeError::InvalidTree(format!(
                "Root {} has weight {}, expected 0",
                root.id(),
                root.weight()
            )));
        }
        let index = AncestorIndex::build(&root).map_err(|duplicate| {
            TreeError::InvalidTree(format!("Duplicate node id {}", duplicate))
        })?;
        if index.max_depth() > MAX_DEPTH {
            return Err(TreeError::InvalidTree(format!(
                "Depth {} exceeds the limit of {}",
                index.max_depth(),
                MAX_DEPTH
            )));
        }
        Ok(Tree {
            root: Some(root),
            index,
            edge_layout: None,
        })
    }

    /// The tree without nodes
    pub fn empty() -> Self {
        Tree {
            root: None,
            index: AncestorIndex::default(),
            edge_layout: None,
        }
    }

    /// Remember the edge list this tree was read from
    pub(crate) fn with_edge_layout(mut self, layout: EdgeLayout) -> Self {
        self.edge_layout = Some(layout);
        self
    }

    /// Edge order and labels recorded by `from_edges`, if any
    pub(crate) fn edge_layout(&self) -> Option<&EdgeLayout> {
        self.edge_layout.as_ref()
    }

    /// Root node, `None` for the empty tree
    pub fn root(&self) -> Option<&Arc<Node>> {
        self.root.as_ref()
    }

    /// Root node, or `EmptyTree`
    pub fn require_root(&self) -> Result<&Arc<Node>> {
        self.root.as_ref().ok_or(TreeError::EmptyTree)
    }

    /// Whether the tree has no nodes
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes
    pub fn size(&self) -> usize {
        self.index.len()
    }

    /// The id to ancestor-path index
    pub fn index(&self) -> &AncestorIndex {
        &self.index
    }

    /// Whether `id` names a node of this tree
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains(id)
    }

    /// Look up a node by id through the ancestor index
    pub fn find(&self, id: &str) -> Option<&Arc<Node>> {
        let path = self.index.path(id)?;
        let mut node = self.root.as_ref()?;
        for position in path {
            node = node.children().get(position)?;
        }
        Some(node)
    }

    /// Ids from the root down to, but excluding, `id`
    pub fn ancestors(&self, id: &str) -> Option<Vec<NodeId>> {
        let path = self.index.path(id)?;
        let mut node = self.root.as_ref()?;
        let mut ancestors = Vec::with_capacity(path.len());
        for position in path {
            ancestors.push(node.id().clone());
            node = node.children().get(position)?;
        }
        Some(ancestors)
    }

    /// Depth of a node (root is 0)
    pub fn node_depth(&self, id: &str) -> Option<usize> {
        self.index.depth(id)
    }

    /// Number of direct children of a node
    pub fn child_count(&self, id: &str) -> Option<usize> {
        self.find(id).map(|node| node.children().len())
    }

    /// Node ids in depth-first pre-order, children in list order
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.index.ids().cloned().collect()
    }

    /// Node, leaf and depth counts
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        let mut stack: Vec<(&Node, usize)> = self.root.iter().map(|root| (&**root, 0)).collect();
        while let Some((node, depth)) = stack.pop() {
            stats.node_count += 1;
            stats.max_depth = stats.max_depth.max(depth);
            if node.is_leaf() {
                stats.leaf_count += 1;
            }
            stack.extend(node.children().iter().map(|child| (&**child, depth + 1)));
        }
        stats
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON; `null` yields the empty tree
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
    }
}

impl Eq for Tree {}

impl Default for Tree {
    fn default() -> Self {
        Self::empty()
    }
}

impl Serialize for Tree {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.root.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Tree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match Option::<Node>::deserialize(deserializer)? {
            Some(root) => Tree::new(root).map_err(serde::de::Error::custom),
            None => Ok(Tree::empty()),
        }
    }
}

impl Tree {
    fn fmt_recursive(f: &mut fmt::Formatter<'_>, node: &Node, indent: usize) -> fmt::Result {
        for _ in 0..indent {
            write!(f, "  ")?;
        }
        writeln!(f, "● {} ({})", node.id(), node.weight())?;

        for child in node.children() {
            Self::fmt_recursive(f, child, indent + 1)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tree(size={})", self.size())?;
        match &self.root {
            Some(root) => Self::fmt_recursive(f, root, 0),
            None => writeln!(f, "∅"),
        }
    }
}
