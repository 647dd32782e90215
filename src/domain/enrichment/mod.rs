//! Enrichment domain
//!
//! Third-party metadata attached to catalog books, the rules deciding whether
//! a metadata record can be trusted, and the port used to fetch it.

mod error;
mod metadata;
mod provider;
mod validity;

pub use error::EnrichmentError;
pub use metadata::EnrichedMetadata;
pub use provider::MetadataProvider;
pub use validity::{is_valid, PLACEHOLDER_AUTHOR, PLACEHOLDER_TITLE};

#[cfg(test)]
pub use provider::MockMetadataProvider;
