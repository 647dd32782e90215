//! Book resource request/response types

use serde::{Deserialize, Serialize};

use crate::domain::book::{Book, BookQuery};
use crate::domain::{DomainError, EnrichedMetadata};
use crate::infrastructure::book::BookPage;

/// Book as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookResponse {
    pub id: String,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub description: String,
    /// `YYYY-MM-DD`
    pub published_date: String,
    pub created_at: String,
    pub updated_at: String,
    pub enriched_data: Option<EnrichedMetadata>,
}

impl From<&Book> for BookResponse {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id().to_string(),
            title: book.title().to_string(),
            author: book.author().to_string(),
            isbn: book.isbn().to_string(),
            description: book.description().to_string(),
            published_date: book.published_date().format("%Y-%m-%d").to_string(),
            created_at: book.created_at().to_rfc3339(),
            updated_at: book.updated_at().to_rfc3339(),
            enriched_data: book.enriched_data().cloned(),
        }
    }
}

/// Paginated book list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookListResponse {
    pub count: usize,
    pub page: usize,
    pub page_size: usize,
    pub results: Vec<BookResponse>,
}

impl From<BookPage> for BookListResponse {
    fn from(page: BookPage) -> Self {
        Self {
            count: page.count,
            page: page.page,
            page_size: page.page_size,
            results: page.results.iter().map(BookResponse::from).collect(),
        }
    }
}

/// `?page=N&page_size=M`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListBooksParams {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl TryFrom<ListBooksParams> for BookQuery {
    type Error = DomainError;

    fn try_from(params: ListBooksParams) -> Result<Self, Self::Error> {
        BookQuery::new(params.page, params.page_size)
    }
}

/// Body of a successful enrichment refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshStatusResponse {
    pub status: String,
}

/// Body of a refresh that found no metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshErrorResponse {
    pub error: String,
}
