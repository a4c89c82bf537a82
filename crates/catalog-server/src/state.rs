//! Application state shared across handlers.

use std::sync::Arc;

use catalog_store::Repository;

use crate::config::ServerConfig;

/// Application state shared across all handlers.
///
/// This is cloneable and can be extracted in handlers using `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Domain-typed storage access.
    repository: Arc<Repository>,
    /// Server configuration.
    config: Arc<ServerConfig>,
}

impl AppState {
    /// Create new application state.
    pub fn new(repository: Repository, config: ServerConfig) -> Self {
        Self {
            repository: Arc::new(repository),
            config: Arc::new(config),
        }
    }

    /// Get a reference to the repository.
    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    /// Get a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
