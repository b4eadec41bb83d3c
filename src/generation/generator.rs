//! Tree generator with an injectable random source

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, instrument};
use super::{GenerationParams, WeightRange};
use crate::edges::to_edges;
use crate::tree::{Edge, Node, NodeId, Tree, Weight};
use crate::Result;

/// Generator of full trees with random edge weights.
///
/// Child ids are `<parent>-<n>`, where `n` counts every node created during
/// one generation call in depth-first pre-order, starting at 1.
pub struct TreeGenerator<R: Rng> {
    rng: R,
}

/// State scoped to a single generation call
struct GenerationSession<'a, R: Rng> {
    rng: &'a mut R,
    branching_factor: usize,
    weight_range: WeightRange,
    next_id: u64,
}

impl<R: Rng> GenerationSession<'_, R> {
    // Recursion depth is bounded by `MAX_DEPTH` through `GenerationParams::validate`
    fn build(&mut self, id: NodeId, weight: Weight, depth: usize) -> Node {
        let mut children = Vec::with_capacity(if depth == 0 { 0 } else { self.branching_factor });
        if depth > 0 {
            for _ in 0..self.branching_factor {
                let child_id = NodeId::new(format!("{}-{}", id, self.next_id));
                self.next_id += 1;
                let child_weight = self.weight_range.sample(&mut *self.rng);
                children.push(self.build(child_id, child_weight, depth - 1));
            }
        }
        Node::with_children(id, weight, children)
    }
}

impl<R: Rng> TreeGenerator<R> {
    /// Create a generator drawing from `rng`
    pub fn new(rng: R) -> Self {
        TreeGenerator { rng }
    }

    /// Generate a full tree
    #[instrument(level = "debug", skip(self, params), fields(
        root = %params.root_id,
        depth = params.depth,
        branching_factor = params.branching_factor
    ))]
    pub fn generate(&mut self, params: &GenerationParams) -> Result<Tree> {
        params.validate()?;

        let mut session = GenerationSession {
            rng: &mut self.rng,
            branching_factor: params.branching_factor,
            weight_range: params.weight_range,
            next_id: 1,
        };
        let root = session.build(params.root_id.clone(), 0, params.depth);
        let tree = Tree::new(root)?;

        debug!(nodes = tree.size(), "generated tree");
        Ok(tree)
    }

    /// Generate a full tree and return it as an edge list
    pub fn generate_edges(&mut self, params: &GenerationParams) -> Result<Vec<Edge>> {
        let tree = self.generate(params)?;
        to_edges(&tree)
    }

    /// Consume the generator, returning its random source
    pub fn into_rng(self) -> R {
        self.rng
    }
}

impl TreeGenerator<StdRng> {
    /// Create a reproducible generator
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

/// Generate one tree per seed, in parallel, in seed order
pub fn generate_batch(params: &GenerationParams, seeds: &[u64]) -> Result<Vec<Tree>> {
    params.validate()?;
    seeds
        .par_iter()
        .map(|&seed| TreeGenerator::seeded(seed).generate(params))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TreeError;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_shape() {
        crate::testing::init_test_setup();
        let tree = TreeGenerator::seeded(7).generate(&GenerationParams::default()).unwrap();

        let stats = tree.stats();
        assert_eq!(stats.node_count, 43);
        assert_eq!(stats.leaf_count, 36);
        assert_eq!(stats.max_depth, 2);
        assert_eq!(tree.child_count("A"), Some(6));
    }

    #[test]
    fn test_ids_use_generation_wide_counter() {
        let params = GenerationParams::default().with_depth(2).with_branching_factor(2);
        let tree = TreeGenerator::seeded(1).generate(&params).unwrap();

        let ids: Vec<String> = tree.node_ids().iter().map(|id| id.to_string()).collect();
        assert_eq!(ids, vec!["A", "A-1", "A-1-2", "A-1-3", "A-4", "A-4-5", "A-4-6"]);
    }

    #[test]
    fn test_depth_zero_is_single_node() {
        let params = GenerationParams::default().with_depth(0);
        let tree = TreeGenerator::seeded(3).generate(&params).unwrap();
        assert_eq!(tree.size(), 1);
        assert_eq!(tree.root().unwrap().weight(), 0);
    }

    #[test]
    fn test_zero_branching_is_single_node() {
        let params = GenerationParams::default().with_depth(4).with_branching_factor(0);
        let tree = TreeGenerator::seeded(3).generate(&params).unwrap();
        assert_eq!(tree.size(), 1);
    }

    #[test]
    fn test_same_seed_same_tree() {
        let params = GenerationParams::default();
        let a = TreeGenerator::seeded(42).generate(&params).unwrap();
        let b = TreeGenerator::seeded(42).generate(&params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_range_rejected() {
        let params = GenerationParams::default().with_weight_range(WeightRange { min: 5, max: 2 });
        let result = TreeGenerator::seeded(0).generate(&params);
        assert!(matches!(result, Err(TreeError::InvalidParameter(_))));
    }

    #[test]
    fn test_deep_chains_rejected_before_generation() {
        let params = GenerationParams::default().with_depth(200_000).with_branching_factor(1);
        assert!(matches!(
            TreeGenerator::seeded(0).generate(&params),
            Err(TreeError::InvalidParameter(_))
        ));

        let params = params.with_depth(crate::tree::MAX_DEPTH);
        let tree = TreeGenerator::seeded(0).generate(&params).unwrap();
        assert_eq!(tree.stats().max_depth, crate::tree::MAX_DEPTH);
    }

    #[test]
    fn test_generate_edges_parent_labels() {
        let params = GenerationParams::default().with_depth(2).with_branching_factor(2);
        let edges = TreeGenerator::seeded(5).generate_edges(&params).unwrap();

        assert_eq!(edges.len(), 6);
        for edge in &edges {
            if edge.source.as_str() == "A" {
                assert_eq!(edge.parent_label, None);
            } else {
                assert_eq!(edge.parent_label.as_ref(), Some(&edge.source));
            }
        }
    }

    #[test]
    fn test_generate_batch_matches_sequential() {
        let params = GenerationParams::default().with_depth(3).with_branching_factor(3);
        let seeds = [1, 2, 3, 4, 5, 6, 7, 8];
        let batch = generate_batch(&params, &seeds).unwrap();

        assert_eq!(batch.len(), seeds.len());
        for (tree, &seed) in batch.iter().zip(&seeds) {
            assert_eq!(*tree, TreeGenerator::seeded(seed).generate(&params).unwrap());
        }
    }

    proptest! {
        #[test]
        fn node_count_matches_geometric_sum(depth in 0usize..6, branching in 0usize..6, seed in any::<u64>()) {
            let params = GenerationParams::default()
                .with_depth(depth)
                .with_branching_factor(branching);
            let tree = TreeGenerator::seeded(seed).generate(&params).unwrap();

            let expected: usize = (0..=depth as u32).map(|i| branching.pow(i)).sum();
            prop_assert_eq!(tree.size(), expected);
            prop_assert_eq!(tree.stats().node_count, expected);
        }

        #[test]
        fn ids_unique_and_weights_in_range(
            depth in 0usize..5,
            branching in 0usize..5,
            min in 1i64..5,
            span in 0i64..6,
            seed in any::<u64>(),
        ) {
            let range = WeightRange { min, max: min + span };
            let params = GenerationParams::default()
                .with_depth(depth)
                .with_branching_factor(branching)
                .with_weight_range(range);
            let tree = TreeGenerator::seeded(seed).generate(&params).unwrap();

            let ids = tree.node_ids();
            let unique: HashSet<_> = ids.iter().collect();
            prop_assert_eq!(unique.len(), ids.len());

            for edge in to_edges(&tree).unwrap() {
                prop_assert!(range.contains(edge.weight));
            }
        }
    }

    #[test]
    fn test_ids_unique_at_upper_bounds() {
        // 10 levels of 10 children is 11 billion nodes; the widest tractable
        // corners of the depth<=10, branching<=10 grid are covered instead
        for (depth, branching) in [(10, 2), (5, 10), (7, 5)] {
            let params = GenerationParams::default()
                .with_depth(depth)
                .with_branching_factor(branching);
            let tree = TreeGenerator::seeded(11).generate(&params).unwrap();
            assert_eq!(Some(tree.size()), params.node_count());
        }
    }
}
