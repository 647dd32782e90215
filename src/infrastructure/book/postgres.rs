//! PostgreSQL book repository implementation

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::Row;

use crate::domain::book::{
    Book, BookFields, BookId, BookQuery, BookRepository, Isbn, DUPLICATE_ISBN_MESSAGE,
};
use crate::domain::enrichment::EnrichedMetadata;
use crate::domain::DomainError;

/// Table and index definitions, applied one statement at a time
const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS books (
        id VARCHAR(36) PRIMARY KEY,
        title VARCHAR(200) NOT NULL,
        author VARCHAR(200) NOT NULL,
        isbn VARCHAR(13) NOT NULL UNIQUE,
        description TEXT NOT NULL DEFAULT '',
        published_date DATE NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        enriched_data JSONB
    )
    "#,
    "CREATE INDEX IF NOT EXISTS books_title_idx ON books (title)",
    "CREATE INDEX IF NOT EXISTS books_author_idx ON books (author)",
];

const BOOK_COLUMNS: &str = "id, title, author, isbn, description, published_date, \
                            created_at, updated_at, enriched_data";

/// PostgreSQL implementation of BookRepository
///
/// The `books` table has a unique index on `isbn`, so a duplicate slipping
/// past the service's pre-check still fails as a field error.
#[derive(Debug, Clone)]
pub struct PostgresBookRepository {
    pool: PgPool,
}

impl PostgresBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool against `url`
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        Ok(Self::new(pool))
    }

    /// Create the `books` table and its indexes when missing
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to create books table: {}", e)))?;
        }

        Ok(())
    }
}

#[async_trait]
impl BookRepository for PostgresBookRepository {
    async fn get(&self, id: &BookId) -> Result<Option<Book>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get book: {}", e)))?;

        row.as_ref().map(row_to_book).transpose()
    }

    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM books WHERE isbn = $1", BOOK_COLUMNS))
            .bind(isbn.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to find book by ISBN: {}", e)))?;

        row.as_ref().map(row_to_book).transpose()
    }

    async fn list(&self, query: &BookQuery) -> Result<Vec<Book>, DomainError> {
        let limit = to_i64(query.page_size())?;
        let offset = to_i64(query.offset())?;

        let rows = sqlx::query(&format!(
            "SELECT {} FROM books ORDER BY created_at DESC, id LIMIT $1 OFFSET $2",
            BOOK_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list books: {}", e)))?;

        rows.iter().map(row_to_book).collect()
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count books: {}", e)))?;

        Ok(count as usize)
    }

    async fn create(&self, book: Book) -> Result<Book, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO books (id, title, author, isbn, description, published_date,
                               created_at, updated_at, enriched_data)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(book.id().as_str())
        .bind(book.title())
        .bind(book.author())
        .bind(book.isbn().as_str())
        .bind(book.description())
        .bind(book.published_date())
        .bind(book.created_at())
        .bind(book.updated_at())
        .bind(book.enriched_data().map(Json))
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(&e.to_string(), &book, "create"))?;

        Ok(book)
    }

    async fn update(&self, book: Book) -> Result<Book, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = $2, author = $3, isbn = $4, description = $5,
                published_date = $6, updated_at = $7, enriched_data = $8
            WHERE id = $1
            "#,
        )
        .bind(book.id().as_str())
        .bind(book.title())
        .bind(book.author())
        .bind(book.isbn().as_str())
        .bind(book.description())
        .bind(book.published_date())
        .bind(book.updated_at())
        .bind(book.enriched_data().map(Json))
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(&e.to_string(), &book, "update"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("Book '{}' not found", book.id())));
        }

        Ok(book)
    }

    async fn delete(&self, id: &BookId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete book: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

fn to_i64(value: usize) -> Result<i64, DomainError> {
    i64::try_from(value).map_err(|_| DomainError::storage(format!("Row offset {} out of range", value)))
}

/// Map a failed INSERT or UPDATE, turning unique violations into domain errors
fn write_error(msg: &str, book: &Book, action: &str) -> DomainError {
    if !(msg.contains("duplicate key") || msg.contains("unique constraint")) {
        return DomainError::storage(format!("Failed to {} book: {}", action, msg));
    }

    if msg.contains("isbn") {
        DomainError::invalid_field("isbn", DUPLICATE_ISBN_MESSAGE)
    } else {
        DomainError::conflict(format!("Book '{}' already exists", book.id()))
    }
}

fn row_to_book(row: &PgRow) -> Result<Book, DomainError> {
    let column = |e: sqlx::Error| DomainError::storage(format!("Failed to read book row: {}", e));

    let id: String = row.try_get("id").map_err(column)?;
    let isbn: String = row.try_get("isbn").map_err(column)?;
    let published_date: NaiveDate = row.try_get("published_date").map_err(column)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(column)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(column)?;
    let enriched_data: Option<Json<EnrichedMetadata>> =
        row.try_get("enriched_data").map_err(column)?;

    let id = BookId::parse(&id)
        .map_err(|_| DomainError::storage(format!("Invalid book ID in database: {}", id)))?;
    let isbn = Isbn::parse(&isbn)
        .map_err(|e| DomainError::storage(format!("Invalid ISBN in database: {}", e)))?;

    let fields = BookFields {
        title: row.try_get("title").map_err(column)?,
        author: row.try_get("author").map_err(column)?,
        isbn,
        description: row.try_get("description").map_err(column)?,
        published_date,
    };

    Ok(Book::restore(
        id,
        fields,
        created_at,
        updated_at,
        enriched_data.map(|Json(record)| record),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::BookInput;

    fn book(isbn: &str) -> Book {
        Book::new(
            BookInput {
                title: Some("Dune".to_string()),
                author: Some("Frank Herbert".to_string()),
                isbn: Some(isbn.to_string()),
                description: None,
                published_date: Some("1965-08-01".to_string()),
            }
            .validate()
            .unwrap(),
        )
    }

    #[test]
    fn test_isbn_violation_is_field_error() {
        let err = write_error(
            r#"error returned from database: duplicate key value violates unique constraint "books_isbn_key""#,
            &book("9780441013593"),
            "create",
        );

        match err {
            DomainError::Validation { fields, .. } => {
                assert_eq!(fields["isbn"], vec![DUPLICATE_ISBN_MESSAGE.to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_id_violation_is_conflict() {
        let err = write_error(
            r#"duplicate key value violates unique constraint "books_pkey""#,
            &book("9780441013593"),
            "create",
        );

        assert!(matches!(err, DomainError::Conflict { .. }));
    }

    #[test]
    fn test_other_failures_are_storage_errors() {
        let err = write_error("connection reset", &book("9780441013593"), "update");

        assert!(matches!(err, DomainError::Storage { .. }));
        assert!(err.to_string().contains("Failed to update book"));
    }

    #[test]
    fn test_schema_indexes_lookup_columns() {
        assert!(SCHEMA[0].contains("isbn VARCHAR(13) NOT NULL UNIQUE"));
        assert!(SCHEMA[1].contains("(title)"));
        assert!(SCHEMA[2].contains("(author)"));
    }

    #[tokio::test]
    #[ignore = "requires a PostgreSQL database at DATABASE_URL"]
    async fn test_round_trip_against_database() {
        let url = std::env::var("DATABASE_URL").unwrap();
        let repo = PostgresBookRepository::connect(&url, 2).await.unwrap();
        repo.ensure_schema().await.unwrap();

        let mut b = book("0000000000");
        repo.delete(b.id()).await.unwrap();
        if let Some(stale) = repo.find_by_isbn(b.isbn()).await.unwrap() {
            repo.delete(stale.id()).await.unwrap();
        }

        repo.create(b.clone()).await.unwrap();
        b.update_enriched_data(EnrichedMetadata::new("Dune", vec!["Frank Herbert".to_string()]));
        repo.update(b.clone()).await.unwrap();

        let stored = repo.find_by_isbn(b.isbn()).await.unwrap().unwrap();
        assert_eq!(stored.enriched_data(), b.enriched_data());
        assert!(matches!(
            repo.create(book("0000000000")).await,
            Err(DomainError::Validation { .. })
        ));

        assert!(repo.delete(b.id()).await.unwrap());
    }
}
