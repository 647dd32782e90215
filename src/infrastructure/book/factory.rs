//! Runtime selection of the book repository backend

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::StorageSettings;
use crate::domain::book::BookRepository;
use crate::domain::DomainError;

use super::in_memory::InMemoryBookRepository;
use super::postgres::PostgresBookRepository;

/// Supported book storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    InMemory,
    Postgres,
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InMemory => write!(f, "in_memory"),
            Self::Postgres => write!(f, "postgres"),
        }
    }
}

impl FromStr for StorageType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "in_memory" | "in-memory" => Ok(Self::InMemory),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            _ => Err(DomainError::configuration(format!(
                "Unknown storage backend: {}. Valid backends: in_memory, postgres",
                s
            ))),
        }
    }
}

/// Builds the book repository named by [`StorageSettings`]
#[derive(Debug, Default)]
pub struct BookRepositoryFactory;

impl BookRepositoryFactory {
    /// Postgres takes `storage.database_url`, then `DATABASE_URL`, and creates
    /// the schema before returning
    pub async fn create(settings: &StorageSettings) -> Result<Arc<dyn BookRepository>, DomainError> {
        match settings.backend.parse::<StorageType>()? {
            StorageType::InMemory => Ok(Arc::new(InMemoryBookRepository::new())),
            StorageType::Postgres => {
                let url = settings
                    .database_url
                    .clone()
                    .or_else(|| std::env::var("DATABASE_URL").ok())
                    .ok_or_else(|| {
                        DomainError::configuration(
                            "storage.database_url or DATABASE_URL is required for postgres",
                        )
                    })?;

                let repository =
                    PostgresBookRepository::connect(&url, settings.max_connections).await?;
                repository.ensure_schema().await?;

                tracing::info!(backend = %StorageType::Postgres, "Book storage ready");
                Ok(Arc::new(repository))
            }
        }
    }
}
