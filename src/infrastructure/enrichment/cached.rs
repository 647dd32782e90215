//! Read-through cache in front of a metadata provider

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::cache::{BookCacheKey, Cache};
use crate::domain::enrichment::{EnrichedMetadata, MetadataProvider};
use crate::infrastructure::observability::record_cache_result;

/// Result of consulting the cache before calling through
enum CacheLookup {
    Hit(EnrichedMetadata),
    Miss,
    /// The store itself failed; skip it for this call
    Unavailable,
}

/// Metadata provider wrapper that serves validated records from a cache
///
/// Cached records are re-checked on every read. Only valid records are
/// written, so a "not found" is never cached and is retried on the next call.
pub struct CachedMetadataProvider<P: MetadataProvider> {
    inner: P,
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl<P: MetadataProvider> fmt::Debug for CachedMetadataProvider<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedMetadataProvider")
            .field("provider", &self.inner.provider_name())
            .field("cache", &self.cache)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl<P: MetadataProvider> CachedMetadataProvider<P> {
    pub fn new(inner: P, cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self { inner, cache, ttl }
    }

    async fn lookup(&self, key: &BookCacheKey) -> CacheLookup {
        let raw = match self.cache.get(key.as_str()).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                record_cache_result("miss");
                tracing::debug!(key = %key, "Metadata cache miss");
                return CacheLookup::Miss;
            }
            Err(e) => {
                record_cache_result("error");
                tracing::warn!(key = %key, error = %e, "Metadata cache read failed, bypassing cache");
                return CacheLookup::Unavailable;
            }
        };

        match serde_json::from_str::<EnrichedMetadata>(&raw) {
            Ok(record) if record.is_valid() => {
                record_cache_result("hit");
                tracing::debug!(key = %key, "Metadata cache hit");
                CacheLookup::Hit(record)
            }
            _ => {
                record_cache_result("invalidated");
                tracing::info!(key = %key, "Evicting invalid cached metadata");

                if let Err(e) = self.cache.delete(key.as_str()).await {
                    record_cache_result("error");
                    tracing::warn!(key = %key, error = %e, "Failed to evict cached metadata");
                }

                CacheLookup::Miss
            }
        }
    }

    async fn store(&self, key: &BookCacheKey, record: &EnrichedMetadata) {
        let json = match serde_json::to_string(record) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to encode metadata for caching");
                return;
            }
        };

        if let Err(e) = self.cache.set(key.as_str(), json, self.ttl).await {
            record_cache_result("error");
            tracing::warn!(key = %key, error = %e, "Failed to cache metadata");
        }
    }
}

#[async_trait]
impl<P: MetadataProvider> MetadataProvider for CachedMetadataProvider<P> {
    async fn fetch(&self, isbn: &str) -> Option<EnrichedMetadata> {
        let key = BookCacheKey::new(isbn);

        match self.lookup(&key).await {
            CacheLookup::Hit(record) => return Some(record),
            CacheLookup::Unavailable => return self.inner.fetch(isbn).await,
            CacheLookup::Miss => {}
        }

        tracing::debug!(
            provider = self.inner.provider_name(),
            isbn = %isbn,
            "Fetching metadata from provider"
        );

        let fresh = self.inner.fetch(isbn).await;

        if let Some(record) = fresh.as_ref().filter(|record| record.is_valid()) {
            self.store(&key, record).await;
        }

        fresh
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }
}
