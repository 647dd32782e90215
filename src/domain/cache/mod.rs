//! Cache domain - Expiring store used by the enrichment cache

mod key;
mod store;

pub use key::BookCacheKey;
pub use store::Cache;

#[cfg(test)]
pub use store::mock::{CacheOp, MockCache};
