//! Thread-safe expansion controller handle

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use super::{ExpandOutcome, ExpansionConfig, LazyExpansionController, VisibleTree};
use crate::tree::Tree;
use crate::Result;

/// Cloneable handle serializing expansion requests from many threads.
///
/// Requests for the same node coalesce: the first one expands it, later ones
/// observe `AlreadyExpanded`. Returned trees are cheap snapshots.
#[derive(Clone, Debug)]
pub struct SharedExpansionController {
    inner: Arc<Mutex<LazyExpansionController>>,
}

impl SharedExpansionController {
    /// Wrap a new controller with the default configuration
    pub fn new(full: impl Into<Arc<Tree>>) -> Result<Self> {
        Ok(Self::from(LazyExpansionController::new(full)?))
    }

    /// Wrap a new controller with `config`
    pub fn with_config(full: impl Into<Arc<Tree>>, config: ExpansionConfig) -> Result<Self> {
        Ok(Self::from(LazyExpansionController::with_config(full, config)?))
    }

    // Every mutation is a single assignment, so a poisoned lock still guards
    // a consistent view.
    fn lock(&self) -> MutexGuard<'_, LazyExpansionController> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// See [`LazyExpansionController::try_expand`]
    pub fn try_expand(&self, id: &str) -> Result<ExpandOutcome> {
        self.lock().try_expand(id)
    }

    /// See [`LazyExpansionController::expand`]
    pub fn expand(&self, id: &str) -> VisibleTree {
        self.lock().expand(id).clone()
    }

    /// Snapshot of the current visible tree
    pub fn visible(&self) -> VisibleTree {
        self.lock().visible().clone()
    }
}

impl From<LazyExpansionController> for SharedExpansionController {
    fn from(controller: LazyExpansionController) -> Self {
        SharedExpansionController {
            inner: Arc::new(Mutex::new(controller)),
        }
    }
}
