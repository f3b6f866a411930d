//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::FullRepository;
use crate::scheduler::GeneratorOptions;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for collaborator access
    pub repository: Arc<dyn FullRepository>,
    /// Slot generation options resolved from configuration
    pub generator: GeneratorOptions,
}

impl AppState {
    /// Create application state with default generator options.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self {
            repository,
            generator: GeneratorOptions::default(),
        }
    }

    /// Create application state with explicit generator options.
    pub fn with_generator(repository: Arc<dyn FullRepository>, generator: GeneratorOptions) -> Self {
        Self {
            repository,
            generator,
        }
    }
}
