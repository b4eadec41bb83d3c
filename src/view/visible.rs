//! Visible nodes and their expansion state

use std::sync::Arc;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use crate::analysis::MaxPathResult;
use crate::tree::{Node, NodeId, Weight};
use crate::Result;

/// Expansion state of a visible node
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expansion {
    /// The node has no children in the full tree
    Leaf,
    /// The node has children in the full tree that are not revealed yet
    Collapsed,
    /// The node's children are revealed, in full-tree order
    Expanded(Revealed),
}

impl Expansion {
    /// Lowercase state name used in render payloads
    pub fn name(&self) -> &'static str {
        match self {
            Expansion::Leaf => "leaf",
            Expansion::Collapsed => "collapsed",
            Expansion::Expanded(_) => "expanded",
        }
    }
}

/// What an expanded node reveals
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Revealed {
    /// Children tracked one by one, each with its own state
    Children(Vec<Arc<VisibleNode>>),
    /// The node's whole subtree, shared with the full tree
    Subtree,
}

/// A node of a visible tree.
///
/// Id, weight and attributes come from the shared full-tree node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibleNode {
    node: Arc<Node>,
    expansion: Expansion,
}

impl VisibleNode {
    /// A node whose children are not revealed: `Leaf` or `Collapsed`
    pub(crate) fn unrevealed(node: &Arc<Node>) -> Self {
        let expansion = if node.is_leaf() {
            Expansion::Leaf
        } else {
            Expansion::Collapsed
        };
        VisibleNode {
            node: Arc::clone(node),
            expansion,
        }
    }

    /// A node with the given expansion state
    pub(crate) fn with_expansion(node: &Arc<Node>, expansion: Expansion) -> Self {
        VisibleNode {
            node: Arc::clone(node),
            expansion,
        }
    }

    /// Node id
    pub fn id(&self) -> &NodeId {
        self.node.id()
    }

    /// Weight of the edge from the parent
    pub fn weight(&self) -> Weight {
        self.node.weight()
    }

    /// The underlying full-tree node
    pub fn full_node(&self) -> &Arc<Node> {
        &self.node
    }

    /// Expansion state
    pub fn expansion(&self) -> &Expansion {
        &self.expansion
    }

    /// Borrowed view of this node
    pub fn as_visible(&self) -> VisibleRef<'_> {
        VisibleRef::Tracked(self)
    }

    /// Revealed children; empty unless expanded
    pub fn children(&self) -> Vec<VisibleRef<'_>> {
        self.as_visible().children()
    }

    /// Children tracked with their own state; empty unless expanded one by one
    pub(crate) fn tracked_children(&self) -> &[Arc<VisibleNode>] {
        match &self.expansion {
            Expansion::Expanded(Revealed::Children(children)) => children,
            _ => &[],
        }
    }

    /// Number of visible nodes in this subtree
    pub fn visible_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match &node.expansion {
                Expansion::Expanded(Revealed::Children(children)) => {
                    count += 1;
                    stack.extend(children.iter().map(|child| &**child));
                }
                Expansion::Expanded(Revealed::Subtree) => count += node.node.subtree_size(),
                Expansion::Leaf | Expansion::Collapsed => count += 1,
            }
        }
        count
    }
}

/// A borrowed node of a visible tree.
///
/// Nodes inside a revealed subtree have no state of their own; they are the
/// full-tree nodes themselves and count as expanded unless they are leaves.
#[derive(Clone, Copy, Debug)]
pub enum VisibleRef<'a> {
    /// Node with its own expansion state
    Tracked(&'a VisibleNode),
    /// Node inside a revealed subtree
    Shared(&'a Arc<Node>),
}

impl<'a> VisibleRef<'a> {
    /// The underlying full-tree node
    pub fn full_node(&self) -> &'a Arc<Node> {
        match *self {
            VisibleRef::Tracked(node) => &node.node,
            VisibleRef::Shared(node) => node,
        }
    }

    /// Node id
    pub fn id(&self) -> &'a NodeId {
        self.full_node().id()
    }

    /// Weight of the edge from the parent
    pub fn weight(&self) -> Weight {
        self.full_node().weight()
    }

    /// The tracked node, `None` inside a revealed subtree
    pub fn tracked(&self) -> Option<&'a VisibleNode> {
        match *self {
            VisibleRef::Tracked(node) => Some(node),
            VisibleRef::Shared(_) => None,
        }
    }

    /// Lowercase state name: `leaf`, `collapsed` or `expanded`
    pub fn state(&self) -> &'static str {
        match *self {
            VisibleRef::Tracked(node) => node.expansion.name(),
            VisibleRef::Shared(node) if node.is_leaf() => "leaf",
            VisibleRef::Shared(_) => "expanded",
        }
    }

    /// Whether the node's children are visible
    pub fn is_expanded(&self) -> bool {
        match *self {
            VisibleRef::Tracked(node) => matches!(node.expansion, Expansion::Expanded(_)),
            VisibleRef::Shared(node) => !node.is_leaf(),
        }
    }

    /// Visible child at `position`
    pub fn child(&self, position: usize) -> Option<VisibleRef<'a>> {
        match *self {
            VisibleRef::Tracked(node) => match &node.expansion {
                Expansion::Expanded(Revealed::Children(children)) => {
                    children.get(position).map(|child| VisibleRef::Tracked(child))
                }
                Expansion::Expanded(Revealed::Subtree) => {
                    node.node.children().get(position).map(VisibleRef::Shared)
                }
                Expansion::Leaf | Expansion::Collapsed => None,
            },
            VisibleRef::Shared(node) => node.children().get(position).map(VisibleRef::Shared),
        }
    }

    /// Visible children in full-tree order
    pub fn children(&self) -> Vec<VisibleRef<'a>> {
        match *self {
            VisibleRef::Tracked(node) => match &node.expansion {
                Expansion::Expanded(Revealed::Children(children)) => {
                    children.iter().map(|child| VisibleRef::Tracked(child)).collect()
                }
                Expansion::Expanded(Revealed::Subtree) => {
                    node.node.children().iter().map(VisibleRef::Shared).collect()
                }
                Expansion::Leaf | Expansion::Collapsed => Vec::new(),
            },
            VisibleRef::Shared(node) => node.children().iter().map(VisibleRef::Shared).collect(),
        }
    }

    /// Number of visible nodes in this subtree
    pub fn visible_count(&self) -> usize {
        match *self {
            VisibleRef::Tracked(node) => node.visible_count(),
            VisibleRef::Shared(node) => node.subtree_size(),
        }
    }
}

/// Serialization view of a visible node with optional path highlighting
struct RenderNode<'a> {
    node: VisibleRef<'a>,
    highlight: Option<&'a MaxPathResult>,
}

impl Serialize for RenderNode<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let attributes = self.node.full_node().attributes();
        let mut state = serializer.serialize_struct("VisibleNode", 6)?;
        state.serialize_field("id", self.node.id())?;
        state.serialize_field("weight", &self.node.weight())?;
        state.serialize_field("state", self.node.state())?;
        state.serialize_field(
            "highlighted",
            &self.highlight.map_or(false, |path| path.contains(self.node.id().as_str())),
        )?;
        let children: Vec<RenderNode<'_>> = self
            .node
            .children()
            .into_iter()
            .map(|child| RenderNode {
                node: child,
                highlight: self.highlight,
            })
            .collect();
        state.serialize_field("children", &children)?;
        if attributes.is_empty() {
            state.skip_field("attributes")?;
        } else {
            state.serialize_field("attributes", attributes)?;
        }
        state.end()
    }
}

impl Serialize for VisibleNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        RenderNode {
            node: self.as_visible(),
            highlight: None,
        }
        .serialize(serializer)
    }
}

/// A rooted, partially revealed projection of a full tree
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VisibleTree {
    root: Arc<VisibleNode>,
}

impl VisibleTree {
    pub(crate) fn from_root(root: Arc<VisibleNode>) -> Self {
        VisibleTree { root }
    }

    /// Root node
    pub fn root(&self) -> &Arc<VisibleNode> {
        &self.root
    }

    /// Number of visible nodes
    pub fn node_count(&self) -> usize {
        self.root.visible_count()
    }

    /// Follow child positions from the root through expanded nodes
    pub fn get(&self, path: &[usize]) -> Option<VisibleRef<'_>> {
        let mut node = self.root.as_visible();
        for &position in path {
            node = node.child(position)?;
        }
        Some(node)
    }

    /// Visible node ids in depth-first pre-order
    pub fn visible_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        let mut stack = vec![self.root.as_visible()];
        while let Some(node) = stack.pop() {
            ids.push(node.id().clone());
            stack.extend(node.children().into_iter().rev());
        }
        ids
    }

    /// Render payload with `highlighted` set on nodes that lie on `highlight`
    pub fn to_render_json(&self, highlight: Option<&MaxPathResult>) -> Result<serde_json::Value> {
        let render = RenderNode {
            node: self.root.as_visible(),
            highlight,
        };
        Ok(serde_json::to_value(render)?)
    }
}
