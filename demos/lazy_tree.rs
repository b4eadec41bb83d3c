//! Generate a tree, find its heaviest path and expand it step by step

use weighted_tree::prelude::*;

fn main() -> Result<()> {
    println!("=== Weighted Tree ===\n");

    let params = GenerationParams::default();
    let tree = TreeGenerator::seeded(2024).generate(&params)?;
    let stats = tree.stats();
    println!(
        "Generated {} nodes ({} leaves, depth {})",
        stats.node_count, stats.leaf_count, stats.max_depth
    );
    if let Some(count) = tree.child_count(params.root_id.as_str()) {
        println!("Root {} has {} direct children", params.root_id, count);
    }

    println!("\n--- Max Weight Path ---");
    let best = max_weight_path(&tree)?;
    let path: Vec<&str> = best.path.iter().map(NodeId::as_str).collect();
    println!("{} (total weight {})", path.join(" -> "), best.total_weight);

    println!("\n--- Edge List ---");
    let edges = to_edges(&tree)?;
    let highlighted = edges.iter().filter(|edge| best.highlights(edge)).count();
    println!("{} edges, {} highlighted", edges.len(), highlighted);
    let rebuilt = from_edges(&edges)?;
    println!("Round trip equal: {}", rebuilt == tree);

    println!("\n--- Lazy Expansion ---");
    let mut controller = LazyExpansionController::new(tree)?;
    println!("Initially visible: {}", controller.visible().node_count());
    for id in best.path.iter().skip(1) {
        let outcome = controller.try_expand(id.as_str())?;
        println!(
            "expand {:<10} {:?}, visible: {}",
            id.as_str(),
            outcome,
            controller.visible().node_count()
        );
    }

    let payload = controller.visible().to_render_json(Some(&best))?;
    println!("\nRender payload root: {}", payload["id"]);

    println!("\n=== Example Complete ===");
    Ok(())
}
