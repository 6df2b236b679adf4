use std::sync::Arc;

use crate::directory::Directory;
use crate::suggestions::provider::SuggestionProvider;
use crate::suggestions::registry::TaskRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Read-only access to employees and projects. Default: PgDirectory.
    pub directory: Arc<dyn Directory>,
    /// Provider used for synchronous calls (skill-gap analysis).
    /// The registry holds the same instance for background goal generation.
    pub provider: Arc<dyn SuggestionProvider>,
    pub tasks: TaskRegistry,
}

impl AppState {
    pub fn new(directory: Arc<dyn Directory>, provider: Arc<dyn SuggestionProvider>) -> Self {
        Self {
            tasks: TaskRegistry::new(Arc::clone(&provider)),
            directory,
            provider,
        }
    }
}
