//! Maximum cumulative-weight root-to-leaf path

use serde::{Serialize, Deserialize};
use tracing::{debug, instrument};
use crate::tree::{Edge, Node, NodeId, Tree, Weight};
use crate::{Result, TreeError};

/// The heaviest root-to-leaf path of a tree
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxPathResult {
    /// Node ids from the root to a leaf
    pub path: Vec<NodeId>,
    /// Sum of the edge weights along `path`
    pub total_weight: Weight,
}

impl MaxPathResult {
    /// Whether `id` lies on the path
    pub fn contains(&self, id: &str) -> bool {
        self.path.iter().any(|node| node.as_str() == id)
    }

    /// Whether a renderer should highlight `edge`: its destination is on the path
    pub fn highlights(&self, edge: &Edge) -> bool {
        self.contains(edge.destination.as_str())
    }

    /// The leaf the path ends at
    pub fn leaf(&self) -> Option<&NodeId> {
        self.path.last()
    }
}

/// Depth-first walk in list order, calling `on_leaf` with every
/// root-to-leaf path and its total weight.
///
/// Fails with `InvalidTree` when a partial sum overflows `Weight`.
fn walk_paths(root: &Node, mut on_leaf: impl FnMut(&[NodeId], Weight)) -> Result<()> {
    let mut current: Vec<NodeId> = Vec::new();
    let mut stack: Vec<(&Node, usize, Weight)> = vec![(root, 0, 0)];

    while let Some((node, depth, total)) = stack.pop() {
        current.truncate(depth);
        current.push(node.id().clone());
        if node.is_leaf() {
            on_leaf(&current, total);
            continue;
        }
        for child in node.children().iter().rev() {
            let total = total.checked_add(child.weight()).ok_or_else(|| {
                TreeError::InvalidTree(format!("Path weight overflows at node {}", child.id()))
            })?;
            stack.push((child, depth + 1, total));
        }
    }
    Ok(())
}

/// Find the root-to-leaf path with the largest total edge weight.
///
/// One depth-first pass, children in list order. Only a strictly heavier
/// path replaces the best so far, so ties resolve to the first path visited.
/// A lone root yields `[root]` with weight 0.
#[instrument(level = "debug", skip(tree), fields(nodes = tree.size()))]
pub fn max_weight_path(tree: &Tree) -> Result<MaxPathResult> {
    let root = tree.require_root()?;
    let mut best: Option<MaxPathResult> = None;
    walk_paths(root, |path, total| {
        if best.as_ref().map_or(true, |b| total > b.total_weight) {
            best = Some(MaxPathResult {
                path: path.to_vec(),
                total_weight: total,
            });
        }
    })?;

    // A non-empty tree always has at least one leaf
    let best = best.unwrap_or(MaxPathResult {
        path: vec![root.id().clone()],
        total_weight: 0,
    });
    debug!(total_weight = best.total_weight, leaf = ?best.leaf(), "max weight path");
    Ok(best)
}

/// Every root-to-leaf path with its total weight, in depth-first order
pub fn root_to_leaf_paths(tree: &Tree) -> Result<Vec<(Vec<NodeId>, Weight)>> {
    let root = tree.require_root()?;
    let mut paths = Vec::new();
    walk_paths(root, |path, total| paths.push((path.to_vec(), total)))?;
    Ok(paths)
}
