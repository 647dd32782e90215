//! Book Catalog API
//!
//! CRUD over a catalog of books, with each book enriched by metadata from
//! the Google Books volumes API through a validating read-through cache.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::AppState;
use domain::BookRepository;
use infrastructure::{
    book::{BookRepositoryFactory, BookService},
    cache::CacheFactory,
    enrichment::{CachedMetadataProvider, GoogleBooksClient},
};
use tracing::info;

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let repository = create_book_repository(config).await?;

    info!(backend = %config.cache.backend, "Creating metadata cache");
    let cache = CacheFactory::new().create(&config.cache).await?;

    info!(api_url = %config.enrichment.api_url, "Creating Google Books client");
    let client = GoogleBooksClient::from_settings(&config.enrichment)?;
    let enricher = CachedMetadataProvider::new(
        client,
        cache.clone(),
        Duration::from_secs(config.cache.ttl_secs),
    );

    let book_service = BookService::new(repository, Arc::new(enricher));

    Ok(AppState::new(Arc::new(book_service), cache))
}

/// Create the book repository for the configured storage backend
pub async fn create_book_repository(
    config: &AppConfig,
) -> anyhow::Result<Arc<dyn BookRepository>> {
    info!(backend = %config.storage.backend, "Creating book storage");
    Ok(BookRepositoryFactory::create(&config.storage).await?)
}
