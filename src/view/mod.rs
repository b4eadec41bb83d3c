//! Lazily expanded views of a full tree
//!
//! A [`VisibleTree`] is a persistent projection of a [`Tree`](crate::Tree):
//! every visible node points at its node in the full tree, and expanding a
//! node rebuilds only the spine from the root to that node. Untouched
//! branches keep their `Arc` identity across expansions, so a renderer can
//! skip them with a pointer comparison.

mod visible;
mod controller;
mod shared;

pub use visible::{Expansion, Revealed, VisibleNode, VisibleRef, VisibleTree};
pub use controller::{ExpandOutcome, ExpansionConfig, LazyExpansionController, RevealPolicy};
pub use shared::SharedExpansionController;
