//! In-memory book repository

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::book::{
    Book, BookId, BookQuery, BookRepository, Isbn, DUPLICATE_ISBN_MESSAGE,
};
use crate::domain::DomainError;

/// Book repository held in a map, for development and tests
///
/// Uniqueness of ids and ISBNs is checked under the write lock, so two
/// concurrent writers cannot both claim the same ISBN.
#[derive(Debug, Default)]
pub struct InMemoryBookRepository {
    books: RwLock<HashMap<BookId, Book>>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn isbn_taken(books: &HashMap<BookId, Book>, book: &Book) -> bool {
    books
        .values()
        .any(|other| other.isbn() == book.isbn() && other.id() != book.id())
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn get(&self, id: &BookId) -> Result<Option<Book>, DomainError> {
        Ok(self.books.read().await.get(id).cloned())
    }

    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>, DomainError> {
        let books = self.books.read().await;
        Ok(books.values().find(|book| book.isbn() == isbn).cloned())
    }

    async fn list(&self, query: &BookQuery) -> Result<Vec<Book>, DomainError> {
        let books = self.books.read().await;
        let mut page: Vec<&Book> = books.values().collect();

        page.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.id().as_str().cmp(b.id().as_str()))
        });

        Ok(page
            .into_iter()
            .skip(query.offset())
            .take(query.page_size())
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.books.read().await.len())
    }

    async fn create(&self, book: Book) -> Result<Book, DomainError> {
        let mut books = self.books.write().await;

        if books.contains_key(book.id()) {
            return Err(DomainError::conflict(format!(
                "Book '{}' already exists",
                book.id()
            )));
        }
        if isbn_taken(&books, &book) {
            return Err(DomainError::invalid_field("isbn", DUPLICATE_ISBN_MESSAGE));
        }

        books.insert(book.id().clone(), book.clone());
        Ok(book)
    }

    async fn update(&self, book: Book) -> Result<Book, DomainError> {
        let mut books = self.books.write().await;

        if !books.contains_key(book.id()) {
            return Err(DomainError::not_found(format!("Book '{}' not found", book.id())));
        }
        if isbn_taken(&books, &book) {
            return Err(DomainError::invalid_field("isbn", DUPLICATE_ISBN_MESSAGE));
        }

        books.insert(book.id().clone(), book.clone());
        Ok(book)
    }

    async fn delete(&self, id: &BookId) -> Result<bool, DomainError> {
        Ok(self.books.write().await.remove(id).is_some())
    }
}
