//! Lazy expansion controller

use std::sync::Arc;
use serde::{Serialize, Deserialize};
use tracing::{debug, instrument};
use super::{Expansion, Revealed, VisibleNode, VisibleRef, VisibleTree};
use crate::tree::{Node, Tree};
use crate::{Result, TreeError};

/// How much of the full tree one expansion reveals
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealPolicy {
    /// The node's whole subtree, shared with the full tree
    #[default]
    FullSubtree,
    /// The node's children, each `Collapsed` or `Leaf`
    OneLevel,
}

/// Expansion configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionConfig {
    /// Reveal policy applied by `expand`
    #[serde(default)]
    pub reveal: RevealPolicy,
}

/// What an expansion request did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpandOutcome {
    /// A collapsed node was expanded, revealing this many new nodes
    Expanded {
        /// Newly visible nodes
        revealed: usize,
    },
    /// The node was expanded before; nothing changed
    AlreadyExpanded,
    /// The node has no children; nothing changed
    Leaf,
    /// The node exists but an ancestor is still collapsed; nothing changed
    Hidden,
}

impl ExpandOutcome {
    /// Whether the visible tree changed
    pub fn changed(&self) -> bool {
        matches!(self, ExpandOutcome::Expanded { .. })
    }
}

/// Owner of a visible tree over an immutable full tree.
///
/// The visible tree starts as the root plus its direct children and only
/// grows. Every request that cannot expand anything leaves it untouched.
#[derive(Clone, Debug)]
pub struct LazyExpansionController {
    full: Arc<Tree>,
    visible: VisibleTree,
    config: ExpansionConfig,
}

impl LazyExpansionController {
    /// Create a controller with the default configuration
    pub fn new(full: impl Into<Arc<Tree>>) -> Result<Self> {
        Self::with_config(full, ExpansionConfig::default())
    }

    /// Create a controller showing the root and its direct children
    pub fn with_config(full: impl Into<Arc<Tree>>, config: ExpansionConfig) -> Result<Self> {
        let full = full.into();
        let root = full.require_root()?;
        let root = if root.is_leaf() {
            VisibleNode::unrevealed(root)
        } else {
            VisibleNode::with_expansion(root, reveal(root, RevealPolicy::OneLevel))
        };
        let visible = VisibleTree::from_root(Arc::new(root));
        Ok(LazyExpansionController {
            full,
            visible,
            config,
        })
    }

    /// The full tree
    pub fn full_tree(&self) -> &Arc<Tree> {
        &self.full
    }

    /// The current visible tree
    pub fn visible(&self) -> &VisibleTree {
        &self.visible
    }

    /// Active configuration
    pub fn config(&self) -> &ExpansionConfig {
        &self.config
    }

    /// The visible node for `id`, if it is currently revealed
    pub fn visible_node(&self, id: &str) -> Option<VisibleRef<'_>> {
        let path = self.full.index().path(id)?;
        self.visible.get(&path)
    }

    /// Expand `id`, reporting what happened.
    ///
    /// Fails with `NodeNotFound` when `id` is not part of the full tree. All
    /// other non-expanding cases are `Ok` outcomes that leave the view as is.
    #[instrument(level = "debug", skip(self))]
    pub fn try_expand(&mut self, id: &str) -> Result<ExpandOutcome> {
        let path = self
            .full
            .index()
            .path(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.into()))?;

        let target = match self.visible.get(&path) {
            Some(VisibleRef::Tracked(target)) => target,
            Some(VisibleRef::Shared(node)) if node.is_leaf() => return Ok(ExpandOutcome::Leaf),
            Some(VisibleRef::Shared(_)) => return Ok(ExpandOutcome::AlreadyExpanded),
            None => return Ok(ExpandOutcome::Hidden),
        };
        match target.expansion() {
            Expansion::Leaf => return Ok(ExpandOutcome::Leaf),
            Expansion::Expanded(_) => return Ok(ExpandOutcome::AlreadyExpanded),
            Expansion::Collapsed => {}
        }

        let full = Arc::clone(target.full_node());
        let expanded = VisibleNode::with_expansion(&full, reveal(&full, self.config.reveal));
        let revealed = expanded.visible_count() - 1;
        let root = replace_along(self.visible.root(), &path, Arc::new(expanded));
        self.visible = VisibleTree::from_root(root);

        debug!(revealed, visible = self.visible.node_count(), "expanded node");
        Ok(ExpandOutcome::Expanded { revealed })
    }

    /// Expand `id` and return the visible tree.
    ///
    /// Unknown ids, leaves, already expanded and hidden nodes are no-ops; they
    /// are logged at debug level.
    pub fn expand(&mut self, id: &str) -> &VisibleTree {
        match self.try_expand(id) {
            Ok(ExpandOutcome::Expanded { .. }) => {}
            Ok(outcome) => debug!(id, ?outcome, "expand ignored"),
            Err(err) => debug!(id, %err, "expand ignored"),
        }
        &self.visible
    }
}

/// Expansion state of `node` once revealed under `policy`
fn reveal(node: &Arc<Node>, policy: RevealPolicy) -> Expansion {
    if node.is_leaf() {
        return Expansion::Leaf;
    }
    match policy {
        RevealPolicy::FullSubtree => Expansion::Expanded(Revealed::Subtree),
        RevealPolicy::OneLevel => Expansion::Expanded(Revealed::Children(
            node.children()
                .iter()
                .map(|child| Arc::new(VisibleNode::unrevealed(child)))
                .collect(),
        )),
    }
}

/// Copy the spine from `node` down `path`, putting `replacement` at its end.
///
/// Siblings along the spine are shared, not copied. `path` must resolve to a
/// tracked node, so every node above it has its children tracked.
fn replace_along(
    node: &Arc<VisibleNode>,
    path: &[usize],
    replacement: Arc<VisibleNode>,
) -> Arc<VisibleNode> {
    let Some((&position, rest)) = path.split_first() else {
        return replacement;
    };
    let mut children = node.tracked_children().to_vec();
    if let Some(slot) = children.get_mut(position) {
        *slot = replace_along(slot, rest, replacement);
    }
    Arc::new(VisibleNode::with_expansion(
        node.full_node(),
        Expansion::Expanded(Revealed::Children(children)),
    ))
}
