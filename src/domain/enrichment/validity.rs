//! Trust rules for metadata records

use super::metadata::EnrichedMetadata;

/// Title of the fixture record that must never be served from cache
pub const PLACEHOLDER_TITLE: &str = "Test Book";
/// Sole author of the fixture record
pub const PLACEHOLDER_AUTHOR: &str = "Test Author";

impl EnrichedMetadata {
    /// True when this is exactly the known fixture record
    pub fn is_placeholder(&self) -> bool {
        self.title.as_deref() == Some(PLACEHOLDER_TITLE)
            && self.authors.len() == 1
            && self.authors[0] == PLACEHOLDER_AUTHOR
    }

    /// True when the record looks like a genuine API payload
    pub fn is_valid(&self) -> bool {
        let has_title = self.title.as_deref().is_some_and(|t| !t.is_empty());

        has_title && !self.authors.is_empty() && !self.is_placeholder()
    }
}

/// Decides whether a candidate record may be cached or served from cache
pub fn is_valid(record: Option<&EnrichedMetadata>) -> bool {
    record.is_some_and(EnrichedMetadata::is_valid)
}
