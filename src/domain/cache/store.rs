//! Metadata cache port

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Expiring key/value store holding JSON documents
///
/// Decoding is left to the caller, so an undecodable entry is reported as a
/// value and never confused with a failing backend.
#[async_trait]
pub trait Cache: Send + Sync + Debug {
    /// Value stored under `key`, `None` once missing or expired
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Store `value` for `ttl`, replacing whatever was there
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), DomainError>;

    /// Remove `key`; true when something was removed
    async fn delete(&self, key: &str) -> Result<bool, DomainError>;

    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.get(key).await?.is_some())
    }
}

#[cfg(test)]
pub mod mock {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use serde::Serialize;

    use super::*;

    /// Cache calls a [`MockCache`] can be told to fail
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum CacheOp {
        Get,
        Set,
        Delete,
    }

    /// Non-expiring cache double that remembers the TTL of every write
    #[derive(Debug, Default)]
    pub struct MockCache {
        entries: Mutex<HashMap<String, (String, Option<Duration>)>>,
        failing: Mutex<HashSet<CacheOp>>,
    }

    impl MockCache {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-seed `key` with the JSON form of `value`
        pub fn with_entry<V: Serialize>(self, key: &str, value: &V) -> Self {
            self.with_raw_entry(key, &serde_json::to_string(value).unwrap())
        }

        pub fn with_raw_entry(self, key: &str, json: &str) -> Self {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), (json.to_string(), None));
            self
        }

        pub fn failing(self, op: CacheOp) -> Self {
            self.failing.lock().unwrap().insert(op);
            self
        }

        pub fn contains(&self, key: &str) -> bool {
            self.entries.lock().unwrap().contains_key(key)
        }

        pub fn raw(&self, key: &str) -> Option<String> {
            self.entries.lock().unwrap().get(key).map(|(json, _)| json.clone())
        }

        /// TTL passed to the last `set` of `key`
        pub fn ttl_of(&self, key: &str) -> Option<Duration> {
            self.entries.lock().unwrap().get(key).and_then(|(_, ttl)| *ttl)
        }

        pub fn entry_count(&self) -> usize {
            self.entries.lock().unwrap().len()
        }

        fn guard(&self, op: CacheOp) -> Result<(), DomainError> {
            if self.failing.lock().unwrap().contains(&op) {
                return Err(DomainError::cache(format!("{:?}: connection refused", op)));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl Cache for MockCache {
        async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
            self.guard(CacheOp::Get)?;
            Ok(self.raw(key))
        }

        async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), DomainError> {
            self.guard(CacheOp::Set)?;
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), (value, Some(ttl)));
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<bool, DomainError> {
            self.guard(CacheOp::Delete)?;
            Ok(self.entries.lock().unwrap().remove(key).is_some())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_records_write_ttl() {
            let cache = MockCache::new();
            cache
                .set("book:1", "{}".to_string(), Duration::from_secs(60))
                .await
                .unwrap();

            assert_eq!(cache.get("book:1").await.unwrap().as_deref(), Some("{}"));
            assert_eq!(cache.ttl_of("book:1"), Some(Duration::from_secs(60)));
            assert!(cache.exists("book:1").await.unwrap());
        }

        #[tokio::test]
        async fn test_failing_op_only_affects_that_op() {
            let cache = MockCache::new().failing(CacheOp::Set);

            assert!(cache.get("book:1").await.unwrap().is_none());
            assert!(cache
                .set("book:1", "{}".to_string(), Duration::from_secs(1))
                .await
                .is_err());
            assert_eq!(cache.entry_count(), 0);
        }
    }
}
