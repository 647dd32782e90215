//! Selects the metadata cache backend from configuration

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::config::CacheSettings;
use crate::domain::cache::Cache;
use crate::domain::DomainError;

use super::in_memory::{InMemoryCache, InMemoryCacheConfig};
use super::redis::RedisCache;

/// Backends accepted by `cache.backend`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheType {
    #[default]
    InMemory,
    Redis,
}

impl fmt::Display for CacheType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InMemory => "in_memory",
            Self::Redis => "redis",
        })
    }
}

impl FromStr for CacheType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "in_memory" | "memory" => Ok(Self::InMemory),
            "redis" => Ok(Self::Redis),
            other => Err(DomainError::configuration(format!(
                "cache.backend '{}' is not one of: in_memory, redis",
                other
            ))),
        }
    }
}

#[derive(Debug, Default)]
pub struct CacheFactory;

impl CacheFactory {
    pub fn new() -> Self {
        Self
    }

    /// Build the backend named by `settings.backend`
    ///
    /// The in-memory backend never keeps an entry longer than `ttl_secs`.
    pub async fn create(&self, settings: &CacheSettings) -> Result<Arc<dyn Cache>, DomainError> {
        match settings.backend.parse::<CacheType>()? {
            CacheType::InMemory => {
                let config = InMemoryCacheConfig::default()
                    .with_max_capacity(settings.max_capacity)
                    .with_max_ttl(Duration::from_secs(settings.ttl_secs.max(1)));

                Ok(Arc::new(InMemoryCache::with_config(config)))
            }
            CacheType::Redis => {
                let url = settings.redis_url.as_deref().ok_or_else(|| {
                    DomainError::configuration("cache.redis_url is required for the redis backend")
                })?;

                Ok(Arc::new(RedisCache::connect(url, settings.key_prefix.clone()).await?))
            }
        }
    }
}
