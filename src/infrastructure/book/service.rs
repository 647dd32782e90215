//! Book service: catalog CRUD plus metadata enrichment

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::book::{
    Book, BookFields, BookId, BookInput, BookQuery, BookRepository, DUPLICATE_ISBN_MESSAGE,
};
use crate::domain::enrichment::MetadataProvider;
use crate::domain::DomainError;

/// One page of the catalog
#[derive(Debug, Clone)]
pub struct BookPage {
    /// Total number of books, across all pages
    pub count: usize,
    pub page: usize,
    pub page_size: usize,
    pub results: Vec<Book>,
}

/// Book service coordinating the repository and the metadata provider
///
/// Enrichment never fails a write: when no metadata comes back the book is
/// saved as submitted and keeps whatever `enriched_data` it already had.
pub struct BookService {
    repository: Arc<dyn BookRepository>,
    enricher: Arc<dyn MetadataProvider>,
}

impl fmt::Debug for BookService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookService")
            .field("repository", &self.repository)
            .field("enricher", &self.enricher.provider_name())
            .finish()
    }
}

impl BookService {
    pub fn new(repository: Arc<dyn BookRepository>, enricher: Arc<dyn MetadataProvider>) -> Self {
        Self {
            repository,
            enricher,
        }
    }

    pub fn repository(&self) -> &Arc<dyn BookRepository> {
        &self.repository
    }

    /// Validate and store a new book, then try to enrich it
    pub async fn create(&self, input: BookInput) -> Result<Book, DomainError> {
        let fields = input.validate().map_err(DomainError::invalid_fields)?;
        self.ensure_isbn_available(&fields, None).await?;

        info!(title = %fields.title, isbn = %fields.isbn, "Creating book");

        let book = self.repository.create(Book::new(fields)).await?;
        Ok(self.enrich(book).await)
    }

    /// Get a book by ID
    pub async fn get(&self, id: &str) -> Result<Book, DomainError> {
        let book_id = BookId::parse(id)?;

        self.repository
            .get(&book_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Book '{}' not found", id)))
    }

    /// List one page of books, newest first
    pub async fn list(&self, query: BookQuery) -> Result<BookPage, DomainError> {
        let count = self.repository.count().await?;
        let results = self.repository.list(&query).await?;

        Ok(BookPage {
            count,
            page: query.page(),
            page_size: query.page_size(),
            results,
        })
    }

    /// Replace every writable field
    pub async fn update(&self, id: &str, input: BookInput) -> Result<Book, DomainError> {
        let book = self.get(id).await?;
        self.save_fields(book, input).await
    }

    /// Change only the fields present in `input`
    pub async fn patch(&self, id: &str, input: BookInput) -> Result<Book, DomainError> {
        let book = self.get(id).await?;
        let merged = input.merged_onto(&book);
        self.save_fields(book, merged).await
    }

    /// Delete a book
    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let book_id = BookId::parse(id)?;

        if !self.repository.delete(&book_id).await? {
            return Err(DomainError::not_found(format!("Book '{}' not found", id)));
        }

        info!(id = %book_id, "Deleted book");
        Ok(())
    }

    /// Fetch metadata for a stored book again
    ///
    /// Returns `Ok(false)` when no metadata could be obtained; the book is left untouched.
    pub async fn refresh_enrichment(&self, id: &str) -> Result<bool, DomainError> {
        let book = self.get(id).await?;

        match self.enricher.fetch(book.isbn().as_str()).await {
            Some(record) => {
                let mut book = book;
                book.update_enriched_data(record);
                self.repository.update(book).await?;
                Ok(true)
            }
            None => {
                debug!(id = %id, "No metadata available for refresh");
                Ok(false)
            }
        }
    }

    async fn save_fields(&self, mut book: Book, input: BookInput) -> Result<Book, DomainError> {
        let fields = input.validate().map_err(DomainError::invalid_fields)?;
        self.ensure_isbn_available(&fields, Some(book.id())).await?;

        book.apply(fields);
        let book = self.repository.update(book).await?;

        info!(id = %book.id(), "Updated book");
        Ok(self.enrich(book).await)
    }

    async fn ensure_isbn_available(
        &self,
        fields: &BookFields,
        current: Option<&BookId>,
    ) -> Result<(), DomainError> {
        match self.repository.find_by_isbn(&fields.isbn).await? {
            Some(existing) if Some(existing.id()) != current => {
                Err(DomainError::invalid_field("isbn", DUPLICATE_ISBN_MESSAGE))
            }
            _ => Ok(()),
        }
    }

    /// Attach fresh metadata to a saved book, keeping the book as-is on any failure
    async fn enrich(&self, book: Book) -> Book {
        let Some(record) = self.enricher.fetch(book.isbn().as_str()).await else {
            debug!(id = %book.id(), isbn = %book.isbn(), "Book saved without enrichment");
            return book;
        };

        let mut enriched = book.clone();
        enriched.update_enriched_data(record);

        match self.repository.update(enriched).await {
            Ok(saved) => saved,
            Err(e) => {
                warn!(id = %book.id(), error = %e, "Failed to store enriched data");
                book
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::MockBookRepository;
    use crate::domain::enrichment::{EnrichedMetadata, MockMetadataProvider};
    use crate::infrastructure::book::InMemoryBookRepository;

    fn hobbit_input() -> BookInput {
        BookInput {
            title: Some("The Hobbit".to_string()),
            author: Some("J.R.R. Tolkien".to_string()),
            isbn: Some("978-0-261-10221-7".to_string()),
            description: Some("The journey of Bilbo Baggins".to_string()),
            published_date: Some("1937-09-21".to_string()),
        }
    }

    fn hobbit_metadata() -> EnrichedMetadata {
        EnrichedMetadata {
            subtitle: Some("Or There and Back Again".to_string()),
            page_count: Some(310),
            ..EnrichedMetadata::new("The Hobbit", vec!["J.R.R. Tolkien".to_string()])
        }
    }

    fn enricher(result: Option<EnrichedMetadata>) -> MockMetadataProvider {
        let mut mock = MockMetadataProvider::new();
        mock.expect_fetch().returning(move |_| result.clone());
        mock.expect_provider_name().return_const("mock");
        mock
    }

    fn service(enricher: MockMetadataProvider) -> BookService {
        let repository = InMemoryBookRepository::new();
        BookService::new(Arc::new(repository), Arc::new(enricher))
    }

    #[tokio::test]
    async fn test_create_enriches_book() {
        let mut mock = MockMetadataProvider::new();
        mock.expect_fetch()
            .withf(|isbn: &str| isbn == "9780261102217")
            .times(1)
            .returning(|_| Some(hobbit_metadata()));
        let service = service(mock);

        let book = service.create(hobbit_input()).await.unwrap();

        assert_eq!(book.isbn().as_str(), "9780261102217");
        assert_eq!(book.enriched_data(), Some(&hobbit_metadata()));

        let stored = service.get(book.id().as_str()).await.unwrap();
        assert_eq!(stored.enriched_data(), Some(&hobbit_metadata()));
    }

    #[tokio::test]
    async fn test_create_without_metadata_still_succeeds() {
        let service = service(enricher(None));

        let book = service.create(hobbit_input()).await.unwrap();

        assert!(book.enriched_data().is_none());
        assert_eq!(service.list(BookQuery::default()).await.unwrap().count, 1);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_fields() {
        let service = service(MockMetadataProvider::new());
        let input = BookInput {
            title: None,
            isbn: Some("123".to_string()),
            ..hobbit_input()
        };

        match service.create(input).await {
            Err(DomainError::Validation { fields, .. }) => {
                assert!(fields.contains_key("title"));
                assert_eq!(
                    fields.get("isbn"),
                    Some(&vec!["ISBN must be 10 or 13 digits long.".to_string()])
                );
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_isbn() {
        let service = service(enricher(None));
        service.create(hobbit_input()).await.unwrap();

        let duplicate = BookInput {
            isbn: Some("9780261102217".to_string()),
            ..hobbit_input()
        };

        match service.create(duplicate).await {
            Err(DomainError::Validation { fields, .. }) => {
                assert_eq!(fields.get("isbn"), Some(&vec![DUPLICATE_ISBN_MESSAGE.to_string()]));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_unknown_or_malformed_id_is_not_found() {
        let service = service(MockMetadataProvider::new());

        assert!(matches!(service.get("999").await, Err(DomainError::NotFound { .. })));
        assert!(matches!(
            service.get(BookId::generate().as_str()).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_keeps_isbn_of_self() {
        let service = service(enricher(None));
        let book = service.create(hobbit_input()).await.unwrap();

        let updated = service
            .update(
                book.id().as_str(),
                BookInput {
                    title: Some("The Hobbit (Illustrated)".to_string()),
                    description: None,
                    ..hobbit_input()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title(), "The Hobbit (Illustrated)");
        assert_eq!(updated.description(), "");
        assert!(updated.updated_at() >= book.updated_at());
    }

    #[tokio::test]
    async fn test_update_requires_every_field() {
        let service = service(enricher(None));
        let book = service.create(hobbit_input()).await.unwrap();

        let result = service
            .update(
                book.id().as_str(),
                BookInput {
                    title: Some("Only a title".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_update_rejects_isbn_of_other_book() {
        let service = service(enricher(None));
        service.create(hobbit_input()).await.unwrap();
        let other = service
            .create(BookInput {
                title: Some("Pride and Prejudice".to_string()),
                author: Some("Jane Austen".to_string()),
                isbn: Some("9780141439518".to_string()),
                ..hobbit_input()
            })
            .await
            .unwrap();

        let result = service
            .patch(
                other.id().as_str(),
                BookInput {
                    isbn: Some("9780261102217".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_patch_changes_only_given_fields() {
        let service = service(enricher(None));
        let book = service.create(hobbit_input()).await.unwrap();

        let patched = service
            .patch(
                book.id().as_str(),
                BookInput {
                    description: Some("There and back again".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(patched.description(), "There and back again");
        assert_eq!(patched.title(), "The Hobbit");
        assert_eq!(patched.published_date(), book.published_date());
    }

    #[tokio::test]
    async fn test_update_keeps_previous_metadata_when_lookup_fails() {
        let mut mock = MockMetadataProvider::new();
        let mut seq = mockall::Sequence::new();
        mock.expect_fetch()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Some(hobbit_metadata()));
        mock.expect_fetch()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| None);
        let service = service(mock);

        let book = service.create(hobbit_input()).await.unwrap();
        let patched = service
            .patch(
                book.id().as_str(),
                BookInput {
                    title: Some("The Hobbit, Revised".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(patched.enriched_data(), Some(&hobbit_metadata()));
    }

    #[tokio::test]
    async fn test_delete() {
        let service = service(enricher(None));
        let book = service.create(hobbit_input()).await.unwrap();

        service.delete(book.id().as_str()).await.unwrap();

        assert!(matches!(
            service.delete(book.id().as_str()).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_refresh_enrichment_stores_new_metadata() {
        let mut mock = MockMetadataProvider::new();
        let mut seq = mockall::Sequence::new();
        mock.expect_fetch()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| None);
        mock.expect_fetch()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Some(hobbit_metadata()));
        let service = service(mock);

        let book = service.create(hobbit_input()).await.unwrap();
        assert!(book.enriched_data().is_none());

        assert!(service.refresh_enrichment(book.id().as_str()).await.unwrap());

        let stored = service.get(book.id().as_str()).await.unwrap();
        assert_eq!(stored.enriched_data(), Some(&hobbit_metadata()));
    }

    #[tokio::test]
    async fn test_refresh_enrichment_without_metadata() {
        let service = service(enricher(None));
        let book = service.create(hobbit_input()).await.unwrap();

        assert!(!service.refresh_enrichment(book.id().as_str()).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_reports_page_and_total() {
        let service = service(enricher(None));
        service.create(hobbit_input()).await.unwrap();

        let page = service.list(BookQuery::new(Some(2), Some(10)).unwrap()).await.unwrap();

        assert_eq!(page.count, 1);
        assert_eq!(page.page, 2);
        assert_eq!(page.page_size, 10);
        assert!(page.results.is_empty());
    }

    #[tokio::test]
    async fn test_storage_errors_propagate() {
        let mut repository = MockBookRepository::new();
        repository
            .expect_count()
            .returning(|| Err(DomainError::storage("connection refused")));
        let service = BookService::new(Arc::new(repository), Arc::new(MockMetadataProvider::new()));

        let result = service.list(BookQuery::default()).await;
        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_isbn_claimed_between_check_and_insert_is_field_error() {
        let mut repository = MockBookRepository::new();
        repository.expect_find_by_isbn().returning(|_| Ok(None));
        repository
            .expect_create()
            .times(1)
            .returning(|_| Err(DomainError::invalid_field("isbn", DUPLICATE_ISBN_MESSAGE)));
        let service = BookService::new(Arc::new(repository), Arc::new(MockMetadataProvider::new()));

        match service.create(hobbit_input()).await {
            Err(DomainError::Validation { fields, .. }) => {
                assert_eq!(fields.get("isbn"), Some(&vec![DUPLICATE_ISBN_MESSAGE.to_string()]));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
