//! Analyses over full trees

mod max_path;

pub use max_path::{max_weight_path, root_to_leaf_paths, MaxPathResult};
