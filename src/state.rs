use std::sync::Arc;

use crate::store::DocumentStore;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone; the store handle is opened once at startup and shared by
/// every request.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }
}
