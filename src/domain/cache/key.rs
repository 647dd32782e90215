//! Cache key derivation

use std::fmt;

/// Key under which the metadata of one ISBN is cached: `book:<isbn>`
///
/// The key space is flat; no other entry kinds share the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BookCacheKey(String);

impl BookCacheKey {
    pub fn new(isbn: &str) -> Self {
        Self(format!("book:{}", isbn))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
