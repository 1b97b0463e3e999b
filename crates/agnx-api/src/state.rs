//! Shared application state for the API handlers.

use std::sync::Arc;

use crate::catalog::{AgentCatalog, EmptyCatalog};
use crate::log::ErrorLog;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor. Both
/// members are read-only, so handlers never synchronize.
#[derive(Clone)]
pub struct AppState {
    /// Where response encoding failures are reported.
    pub error_log: Arc<dyn ErrorLog>,
    /// Source for the agent listing endpoint.
    pub catalog: Arc<dyn AgentCatalog>,
}

impl AppState {
    /// Create state with an empty agent catalog.
    pub fn new(error_log: Arc<dyn ErrorLog>) -> Self {
        Self {
            error_log,
            catalog: Arc::new(EmptyCatalog),
        }
    }

    /// Replace the agent catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<dyn AgentCatalog>) -> Self {
        self.catalog = catalog;
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
