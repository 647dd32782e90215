//! Book repository trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::{Book, BookId};
use super::isbn::Isbn;
use crate::domain::DomainError;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;
pub const INVALID_PAGE_MESSAGE: &str = "Invalid page.";
/// Message attached to `isbn` when another book already holds it
pub const DUPLICATE_ISBN_MESSAGE: &str = "book with this isbn already exists.";

/// Page selection for listing books
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookQuery {
    /// 1-based page number
    page: usize,
    page_size: usize,
}

impl Default for BookQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl BookQuery {
    /// Build a query from optional client values, clamping them into range
    ///
    /// A page whose offset no longer fits a row offset is reported as
    /// not found, the same as any other page with nothing on it.
    pub fn new(page: Option<usize>, page_size: Option<usize>) -> Result<Self, DomainError> {
        let query = Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        };

        match query.checked_offset() {
            Some(offset) if i64::try_from(offset).is_ok() => Ok(query),
            _ => Err(DomainError::not_found(INVALID_PAGE_MESSAGE)),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of books skipped before this page
    pub fn offset(&self) -> usize {
        self.checked_offset().unwrap_or(usize::MAX)
    }

    fn checked_offset(&self) -> Option<usize> {
        (self.page - 1).checked_mul(self.page_size)
    }
}

/// Repository for managing books
///
/// ISBNs are unique across the catalog: `create` and `update` reject a book
/// whose ISBN another book already holds with a field error on `isbn`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BookRepository: Send + Sync + std::fmt::Debug {
    /// Get a book by ID
    async fn get(&self, id: &BookId) -> Result<Option<Book>, DomainError>;

    /// Find the book holding an ISBN
    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>, DomainError>;

    /// List one page of books, newest first
    async fn list(&self, query: &BookQuery) -> Result<Vec<Book>, DomainError>;

    /// Count all books
    async fn count(&self) -> Result<usize, DomainError>;

    /// Create a new book
    async fn create(&self, book: Book) -> Result<Book, DomainError>;

    /// Update an existing book
    async fn update(&self, book: Book) -> Result<Book, DomainError>;

    /// Delete a book, returns true if it existed
    async fn delete(&self, id: &BookId) -> Result<bool, DomainError>;
}
