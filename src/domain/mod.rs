//! Domain layer - Core business logic and entities

pub mod book;
pub mod cache;
pub mod enrichment;
pub mod error;

pub use book::{Book, BookFields, BookId, BookInput, BookQuery, BookRepository, Isbn};
pub use cache::{BookCacheKey, Cache};
pub use enrichment::{is_valid, EnrichedMetadata, EnrichmentError, MetadataProvider};
pub use error::{DomainError, FieldErrors};
