//! Id to ancestor-path index
//!
//! Maps every node id to its parent slot and its position among the parent's
//! children, so the positional path from the root to any node can be rebuilt
//! in time proportional to its depth. Lookups never depend on the content of
//! the id text.

use std::collections::HashMap;
use super::{Node, NodeId};

#[derive(Clone, Debug, PartialEq, Eq)]
struct Slot {
    id: NodeId,
    parent: Option<usize>,
    position: usize,
    depth: usize,
}

/// Positional path index of a tree, built once per tree
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AncestorIndex {
    slots: Vec<Slot>,
    by_id: HashMap<NodeId, usize>,
}

impl AncestorIndex {
    /// Build the index for the subtree rooted at `root`.
    ///
    /// Slots are assigned in depth-first pre-order. Fails with the first id
    /// that occurs twice.
    pub fn build(root: &Node) -> Result<Self, NodeId> {
        let mut index = AncestorIndex::default();
        let mut stack: Vec<(&Node, Option<usize>, usize, usize)> = vec![(root, None, 0, 0)];

        while let Some((node, parent, position, depth)) = stack.pop() {
            let slot = index.slots.len();
            if index.by_id.insert(node.id().clone(), slot).is_some() {
                return Err(node.id().clone());
            }
            index.slots.push(Slot {
                id: node.id().clone(),
                parent,
                position,
                depth,
            });
            for (position, child) in node.children().iter().enumerate().rev() {
                stack.push((child, Some(slot), position, depth + 1));
            }
        }
        Ok(index)
    }

    /// Child positions from the root to `id`; empty for the root itself
    pub fn path(&self, id: &str) -> Option<Vec<usize>> {
        let mut slot = &self.slots[*self.by_id.get(id)?];
        let mut path = Vec::with_capacity(slot.depth);
        while let Some(parent) = slot.parent {
            path.push(slot.position);
            slot = &self.slots[parent];
        }
        path.reverse();
        Some(path)
    }

    /// Parent id of `id`; `None` for the root and unknown ids
    pub fn parent(&self, id: &str) -> Option<&NodeId> {
        let parent = self.slots[*self.by_id.get(id)?].parent?;
        Some(&self.slots[parent].id)
    }

    /// Depth of `id` (root is 0)
    pub fn depth(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).map(|&slot| self.slots[slot].depth)
    }

    /// Depth of the deepest node
    pub fn max_depth(&self) -> usize {
        self.slots.iter().map(|slot| slot.depth).max().unwrap_or(0)
    }

    /// Indexed ids in depth-first pre-order
    pub fn ids(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.slots.iter().map(|slot| &slot.id)
    }

    /// Whether `id` is present
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Number of indexed nodes
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True for the index of an empty tree
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
