//! Repository factory for dependency injection.
//!
//! Creates repository instances from runtime configuration. The engine only
//! ships an in-memory backend; a relational backend plugs in here without
//! touching the scheduling logic.

use std::str::FromStr;
use std::sync::Arc;

use super::repositories::LocalRepository;
use super::repository::{ErrorContext, FullRepository, RepositoryError, RepositoryResult};

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from the `TAVOLA_REPOSITORY` environment
    /// variable, defaulting to the local backend.
    pub fn from_env() -> Self {
        std::env::var("TAVOLA_REPOSITORY")
            .ok()
            .and_then(|val| val.parse().ok())
            .unwrap_or(Self::Local)
    }
}

/// Repository factory for creating repository instances.
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    pub fn create(repo_type: RepositoryType) -> RepositoryResult<Arc<dyn FullRepository>> {
        match repo_type {
            RepositoryType::Local => Ok(Arc::new(LocalRepository::new())),
        }
    }

    /// Create a local in-memory repository directly.
    pub fn create_local() -> Arc<LocalRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create a repository from a configuration string (e.g., a config file
    /// `type` value).
    pub fn create_from_name(name: &str) -> RepositoryResult<Arc<dyn FullRepository>> {
        let repo_type = name.parse::<RepositoryType>().map_err(|e| {
            RepositoryError::configuration(e, ErrorContext::new("create_repository"))
        })?;
        Self::create(repo_type)
    }
}
