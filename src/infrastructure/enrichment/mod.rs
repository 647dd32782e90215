//! Enrichment adapters: the Google Books client and its read-through cache

mod cached;
mod google_books;

pub use cached::CachedMetadataProvider;
pub use google_books::GoogleBooksClient;
