//! Enriched metadata record

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Metadata fetched from the external volume API for one ISBN
///
/// Produced fresh on every successful lookup and replaced wholesale on a
/// book, never patched field by field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichedMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    /// Free-form, not guaranteed to be an ISO date
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub page_count: Option<i64>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub ratings_count: Option<i64>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub preview_link: Option<String>,
    #[serde(default)]
    pub info_link: Option<String>,
    /// Size name (`thumbnail`, `smallThumbnail`, ...) to image URL
    #[serde(default)]
    pub image_links: BTreeMap<String, String>,
}

impl EnrichedMetadata {
    pub fn new(title: impl Into<String>, authors: Vec<String>) -> Self {
        Self {
            title: Some(title.into()),
            authors,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_collections_default_to_empty() {
        let record: EnrichedMetadata = serde_json::from_str(r#"{"title": "Dune"}"#).unwrap();

        assert_eq!(record.title.as_deref(), Some("Dune"));
        assert!(record.authors.is_empty());
        assert!(record.categories.is_empty());
        assert!(record.image_links.is_empty());
        assert!(record.page_count.is_none());
    }

    #[test]
    fn test_serializes_snake_case_fields() {
        let mut record = EnrichedMetadata::new("The Hobbit", vec!["J.R.R. Tolkien".to_string()]);
        record.page_count = Some(310);
        record
            .image_links
            .insert("thumbnail".to_string(), "http://books.google.com/image.jpg".to_string());

        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["page_count"], 310);
        assert_eq!(json["image_links"]["thumbnail"], "http://books.google.com/image.jpg");
        assert!(json["published_date"].is_null());
    }
}
