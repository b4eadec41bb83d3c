//! Export to petgraph

use petgraph::graph::{Graph, NodeIndex};
use crate::tree::{Node, NodeId, Tree, Weight};
use crate::Result;

/// Convert a tree to a directed petgraph graph.
///
/// Node weights are ids, edge weights are edge weights. Nodes are added in
/// depth-first pre-order, so the root is `NodeIndex::new(0)`.
pub fn to_digraph(tree: &Tree) -> Result<Graph<NodeId, Weight>> {
    fn visit(node: &Node, index: NodeIndex, graph: &mut Graph<NodeId, Weight>) {
        for child in node.children() {
            let child_index = graph.add_node(child.id().clone());
            graph.add_edge(index, child_index, child.weight());
            visit(child, child_index, graph);
        }
    }

    let root = tree.require_root()?;
    let mut graph = Graph::with_capacity(tree.size(), tree.size().saturating_sub(1));
    let root_index = graph.add_node(root.id().clone());
    visit(root, root_index, &mut graph);
    Ok(graph)
}
