//! Sample catalog data

use crate::domain::book::{Book, BookInput, BookRepository};
use crate::domain::DomainError;

/// (title, author, isbn, description, published_date)
const SAMPLE_BOOKS: [(&str, &str, &str, &str, &str); 5] = [
    (
        "The Lord of the Rings: The Fellowship of the Ring",
        "J.R.R. Tolkien",
        "9780261103573",
        "First volume of The Lord of the Rings trilogy",
        "1954-07-29",
    ),
    (
        "The Hobbit",
        "J.R.R. Tolkien",
        "9780261102217",
        "The journey of Bilbo Baggins",
        "1937-09-21",
    ),
    (
        "Harry Potter and the Philosopher's Stone",
        "J.K. Rowling",
        "9780747532743",
        "Harry's first year at Hogwarts",
        "1997-06-26",
    ),
    (
        "Pride and Prejudice",
        "Jane Austen",
        "9780141439518",
        "A classic of English literature",
        "1813-01-28",
    ),
    (
        "The Little Prince",
        "Antoine de Saint-Exupéry",
        "9780156012195",
        "A story about love and friendship",
        "1943-04-06",
    ),
];

/// What happened to one sample book
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    Created(String),
    AlreadyExists(String),
}

/// Insert every sample book whose ISBN is not stored yet
///
/// Books are stored as-is, without metadata enrichment.
pub async fn seed_sample_books(
    repository: &dyn BookRepository,
) -> Result<Vec<SeedOutcome>, DomainError> {
    let mut outcomes = Vec::with_capacity(SAMPLE_BOOKS.len());

    for (title, author, isbn, description, published_date) in SAMPLE_BOOKS {
        let fields = BookInput {
            title: Some(title.to_string()),
            author: Some(author.to_string()),
            isbn: Some(isbn.to_string()),
            description: Some(description.to_string()),
            published_date: Some(published_date.to_string()),
        }
        .validate()
        .map_err(DomainError::invalid_fields)?;

        if let Some(existing) = repository.find_by_isbn(&fields.isbn).await? {
            tracing::debug!(isbn = %fields.isbn, "Sample book already stored");
            outcomes.push(SeedOutcome::AlreadyExists(existing.title().to_string()));
            continue;
        }

        let book = repository.create(Book::new(fields)).await?;
        tracing::info!(id = %book.id(), title = %book.title(), "Seeded sample book");
        outcomes.push(SeedOutcome::Created(book.title().to_string()));
    }

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::{BookQuery, Isbn};
    use crate::infrastructure::book::InMemoryBookRepository;

    #[tokio::test]
    async fn test_seed_creates_all_samples() {
        let repository = InMemoryBookRepository::new();

        let outcomes = seed_sample_books(&repository).await.unwrap();

        assert_eq!(outcomes.len(), 5);
        assert!(outcomes.iter().all(|o| matches!(o, SeedOutcome::Created(_))));
        assert_eq!(repository.count().await.unwrap(), 5);

        let hobbit = repository
            .find_by_isbn(&Isbn::parse("9780261102217").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hobbit.to_string(), "The Hobbit by J.R.R. Tolkien");
        assert!(hobbit.enriched_data().is_none());
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let repository = InMemoryBookRepository::new();

        seed_sample_books(&repository).await.unwrap();
        let outcomes = seed_sample_books(&repository).await.unwrap();

        assert_eq!(
            outcomes[1],
            SeedOutcome::AlreadyExists("The Hobbit".to_string())
        );
        assert!(outcomes.iter().all(|o| matches!(o, SeedOutcome::AlreadyExists(_))));
        assert_eq!(repository.list(&BookQuery::default()).await.unwrap().len(), 5);
    }
}
