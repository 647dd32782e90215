//! Application state for shared services

use std::sync::Arc;

use crate::domain::cache::Cache;
use crate::infrastructure::book::BookService;

/// Shared handler state
#[derive(Debug, Clone)]
pub struct AppState {
    pub book_service: Arc<BookService>,
    /// Metadata cache, also checked by `/ready`
    pub cache: Arc<dyn Cache>,
}

impl AppState {
    pub fn new(book_service: Arc<BookService>, cache: Arc<dyn Cache>) -> Self {
        Self {
            book_service,
            cache,
        }
    }
}
