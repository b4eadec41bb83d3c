//! Generation parameters

use rand::Rng;
use serde::{Serialize, Deserialize};
use crate::tree::{NodeId, Weight, MAX_DEPTH};
use crate::{Result, TreeError};

/// Upper bound on generated tree size unless overridden
pub const DEFAULT_MAX_NODES: usize = 1_000_000;

/// Inclusive range of edge weights
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightRange {
    /// Smallest weight
    pub min: Weight,
    /// Largest weight
    pub max: Weight,
}

impl WeightRange {
    /// Create a range, failing when `min > max`
    pub fn new(min: Weight, max: Weight) -> Result<Self> {
        let range = WeightRange { min, max };
        range.validate()?;
        Ok(range)
    }

    /// Check `min <= max`
    pub fn validate(&self) -> Result<()> {
        if self.min > self.max {
            return Err(TreeError::InvalidParameter(format!(
                "Weight range min {} exceeds max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// Sample a weight uniformly from the inclusive range
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Weight {
        rng.gen_range(self.min..=self.max)
    }

    /// Whether `weight` lies inside the range
    pub fn contains(&self, weight: Weight) -> bool {
        (self.min..=self.max).contains(&weight)
    }
}

impl Default for WeightRange {
    fn default() -> Self {
        WeightRange { min: 1, max: 10 }
    }
}

/// Parameters of one generation call
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Id of the root node
    pub root_id: NodeId,
    /// Edges on every root-to-leaf path
    pub depth: usize,
    /// Children per internal node
    pub branching_factor: usize,
    /// Edge weight range
    #[serde(default)]
    pub weight_range: WeightRange,
    /// Largest accepted tree size
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,
}

fn default_max_nodes() -> usize {
    DEFAULT_MAX_NODES
}

impl GenerationParams {
    /// Create validated parameters
    pub fn new(
        root_id: impl Into<NodeId>,
        depth: usize,
        branching_factor: usize,
        weight_range: WeightRange,
    ) -> Result<Self> {
        let params = GenerationParams {
            root_id: root_id.into(),
            depth,
            branching_factor,
            weight_range,
            max_nodes: DEFAULT_MAX_NODES,
        };
        params.validate()?;
        Ok(params)
    }

    /// Create parameters from unchecked signed input
    pub fn try_new(
        root_id: impl Into<NodeId>,
        depth: i64,
        branching_factor: i64,
        min_weight: Weight,
        max_weight: Weight,
    ) -> Result<Self> {
        let depth = usize::try_from(depth)
            .map_err(|_| TreeError::InvalidParameter(format!("Negative depth {}", depth)))?;
        let branching_factor = usize::try_from(branching_factor).map_err(|_| {
            TreeError::InvalidParameter(format!("Negative branching factor {}", branching_factor))
        })?;
        Self::new(root_id, depth, branching_factor, WeightRange::new(min_weight, max_weight)?)
    }

    /// Parse and validate parameters from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let params: GenerationParams = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Set the root id
    pub fn with_root_id(mut self, root_id: impl Into<NodeId>) -> Self {
        self.root_id = root_id.into();
        self
    }

    /// Set the depth
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Set the branching factor
    pub fn with_branching_factor(mut self, branching_factor: usize) -> Self {
        self.branching_factor = branching_factor;
        self
    }

    /// Set the weight range
    pub fn with_weight_range(mut self, weight_range: WeightRange) -> Self {
        self.weight_range = weight_range;
        self
    }

    /// Set the size guard
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Number of nodes a tree with these parameters has: sum of B^i for i in 0..=depth.
    ///
    /// `None` on overflow.
    pub fn node_count(&self) -> Option<usize> {
        let mut total: usize = 1;
        let mut level: usize = 1;
        for _ in 0..self.depth {
            if self.branching_factor == 0 {
                break;
            }
            level = level.checked_mul(self.branching_factor)?;
            total = total.checked_add(level)?;
        }
        Some(total)
    }

    /// Edges on every root-to-leaf path of the generated tree
    fn effective_depth(&self) -> usize {
        if self.branching_factor == 0 {
            0
        } else {
            self.depth
        }
    }

    /// Check the weight range, the depth limit, path-sum overflow and the size guard
    pub fn validate(&self) -> Result<()> {
        self.weight_range.validate()?;
        let depth = self.effective_depth();
        if depth > MAX_DEPTH {
            return Err(TreeError::InvalidParameter(format!(
                "Depth {} exceeds the limit of {}",
                depth, MAX_DEPTH
            )));
        }
        // A path of k edges sums to between k * min and k * max
        let steps = depth as Weight;
        if self.weight_range.min.checked_mul(steps).is_none()
            || self.weight_range.max.checked_mul(steps).is_none()
        {
            return Err(TreeError::InvalidParameter(format!(
                "Path weights over {} edges in {}..={} overflow",
                depth, self.weight_range.min, self.weight_range.max
            )));
        }
        match self.node_count() {
            Some(count) if count <= self.max_nodes => Ok(()),
            Some(count) => Err(TreeError::InvalidParameter(format!(
                "Tree of depth {} and branching factor {} has {} nodes, limit is {}",
                self.depth, self.branching_factor, count, self.max_nodes
            ))),
            None => Err(TreeError::InvalidParameter(format!(
                "Tree of depth {} and branching factor {} is too large",
                self.depth, self.branching_factor
            ))),
        }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        GenerationParams {
            root_id: NodeId::from("A"),
            depth: 2,
            branching_factor: 6,
            weight_range: WeightRange::default(),
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_count() {
        assert_eq!(GenerationParams::default().node_count(), Some(43));
        let params = GenerationParams::default().with_depth(0);
        assert_eq!(params.node_count(), Some(1));
        let params = GenerationParams::default().with_branching_factor(0).with_depth(5);
        assert_eq!(params.node_count(), Some(1));
        let params = GenerationParams::default().with_branching_factor(1).with_depth(5);
        assert_eq!(params.node_count(), Some(6));
    }

    #[test]
    fn test_negative_inputs_rejected() {
        assert!(matches!(
            GenerationParams::try_new("A", -1, 2, 1, 10),
            Err(TreeError::InvalidParameter(_))
        ));
        assert!(matches!(
            GenerationParams::try_new("A", 2, -3, 1, 10),
            Err(TreeError::InvalidParameter(_))
        ));
        assert!(matches!(
            GenerationParams::try_new("A", 2, 3, 10, 1),
            Err(TreeError::InvalidParameter(_))
        ));
        assert!(GenerationParams::try_new("A", 0, 0, 5, 5).is_ok());
    }

    #[test]
    fn test_size_guard() {
        let params = GenerationParams::default().with_depth(40).with_branching_factor(10);
        assert!(matches!(params.validate(), Err(TreeError::InvalidParameter(_))));

        let params = GenerationParams::default().with_max_nodes(10);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_depth_limit() {
        let chain = GenerationParams::default().with_depth(200_000).with_branching_factor(1);
        assert!(matches!(chain.validate(), Err(TreeError::InvalidParameter(_))));

        let chain = chain.with_depth(MAX_DEPTH + 1);
        assert!(chain.validate().is_err());
        assert!(chain.with_depth(MAX_DEPTH).validate().is_ok());

        let flat = GenerationParams::default().with_depth(200_000).with_branching_factor(0);
        assert!(flat.validate().is_ok());
    }

    #[test]
    fn test_path_sum_overflow_rejected() {
        let huge = WeightRange { min: i64::MAX - 1, max: i64::MAX };
        let params = GenerationParams::default()
            .with_depth(2)
            .with_branching_factor(1)
            .with_weight_range(huge);
        assert!(matches!(params.validate(), Err(TreeError::InvalidParameter(_))));
        assert!(params.clone().with_depth(1).validate().is_ok());

        let low = WeightRange { min: i64::MIN / 2, max: 0 };
        let params = params.with_weight_range(low).with_depth(3);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_from_json_defaults() {
        let params = GenerationParams::from_json(
            r#"{"root_id": "R", "depth": 3, "branching_factor": 2}"#,
        )
        .unwrap();
        assert_eq!(params.root_id, NodeId::from("R"));
        assert_eq!(params.weight_range, WeightRange { min: 1, max: 10 });
        assert_eq!(params.max_nodes, DEFAULT_MAX_NODES);

        let invalid = GenerationParams::from_json(
            r#"{"root_id": "R", "depth": 3, "branching_factor": 2, "weight_range": {"min": 4, "max": 1}}"#,
        );
        assert!(matches!(invalid, Err(TreeError::InvalidParameter(_))));
    }
}
