//! Shared state handed to every handler.

use std::sync::Arc;

use crate::storage::TaskStore;

/// Application state: the storage strategy chosen at startup.
pub struct AppState<S: TaskStore> {
    pub store: Arc<S>,
}

impl<S: TaskStore> AppState<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

// Manual impl: derive(Clone) would require S: Clone.
impl<S: TaskStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}
