//! Metadata provider port

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::metadata::EnrichedMetadata;

/// Source of metadata for a normalized ISBN
///
/// `None` covers both "no such ISBN" and any failure on the way; providers
/// log the difference but never hand an error to the caller.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch metadata for an ISBN that is already digits-only, 10 or 13 long
    async fn fetch(&self, isbn: &str) -> Option<EnrichedMetadata>;

    /// Short provider name for logs
    fn provider_name(&self) -> &'static str;
}
