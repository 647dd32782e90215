//! Google Books volume lookup client

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::config::EnrichmentSettings;
use crate::domain::enrichment::{EnrichedMetadata, EnrichmentError, MetadataProvider};
use crate::domain::DomainError;
use crate::infrastructure::observability::record_enrichment_outcome;

/// Fields read leniently out of a `volumeInfo` object
///
/// A field of the wrong type counts as absent, so one odd value never costs
/// the rest of the record.
struct VolumeInfo<'a>(&'a Map<String, Value>);

impl VolumeInfo<'_> {
    fn text(&self, field: &str) -> Option<String> {
        self.0.get(field).and_then(Value::as_str).map(str::to_string)
    }

    fn integer(&self, field: &str) -> Option<i64> {
        self.0.get(field).and_then(Value::as_i64)
    }

    fn texts(&self, field: &str) -> Vec<String> {
        self.0
            .get(field)
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn links(&self, field: &str) -> BTreeMap<String, String> {
        self.0
            .get(field)
            .and_then(Value::as_object)
            .map(|links| {
                links
                    .iter()
                    .filter_map(|(size, url)| Some((size.clone(), url.as_str()?.to_string())))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn to_metadata(&self) -> EnrichedMetadata {
        EnrichedMetadata {
            title: self.text("title"),
            subtitle: self.text("subtitle"),
            authors: self.texts("authors"),
            publisher: self.text("publisher"),
            published_date: self.text("publishedDate"),
            description: self.text("description"),
            page_count: self.integer("pageCount"),
            categories: self.texts("categories"),
            average_rating: self.0.get("averageRating").and_then(Value::as_f64),
            ratings_count: self.integer("ratingsCount"),
            language: self.text("language"),
            preview_link: self.text("previewLink"),
            info_link: self.text("infoLink"),
            image_links: self.links("imageLinks"),
        }
    }
}

/// HTTP client for the Google Books `volumes` endpoint
#[derive(Debug, Clone)]
pub struct GoogleBooksClient {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl GoogleBooksClient {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key: None,
        })
    }

    pub fn from_settings(settings: &EnrichmentSettings) -> Result<Self, DomainError> {
        let client = Self::new(&settings.api_url, Duration::from_secs(settings.timeout_secs))?;

        Ok(match &settings.api_key {
            Some(key) if !key.is_empty() => client.with_api_key(key.clone()),
            _ => client,
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Look up one ISBN, keeping every failure kind distinct
    ///
    /// `Ok(None)` means the API answered and has no volume for the ISBN.
    pub async fn lookup(&self, isbn: &str) -> Result<Option<EnrichedMetadata>, EnrichmentError> {
        let mut request = self
            .client
            .get(&self.api_url)
            .query(&[("q", format!("isbn:{}", isbn))]);

        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| EnrichmentError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| EnrichmentError::Transport(e.to_string()))?;

        let payload: Value =
            serde_json::from_slice(&body).map_err(|e| EnrichmentError::Parse(e.to_string()))?;

        parse_volumes(&payload)
    }
}

/// Extract the first volume from a decoded search response
///
/// Zero or missing results mean "not found". Once results are announced the
/// first item must carry a `volumeInfo` object.
fn parse_volumes(payload: &Value) -> Result<Option<EnrichedMetadata>, EnrichmentError> {
    let response = payload
        .as_object()
        .ok_or_else(|| EnrichmentError::Shape("response is not an object".to_string()))?;

    let total = response.get("totalItems").and_then(Value::as_u64).unwrap_or(0);
    let items = match response.get("items").and_then(Value::as_array) {
        Some(items) if total > 0 => items,
        _ => return Ok(None),
    };

    let first = items
        .first()
        .ok_or_else(|| EnrichmentError::Shape("`items` is empty".to_string()))?;

    let info = first
        .get("volumeInfo")
        .ok_or_else(|| EnrichmentError::Shape("first item has no `volumeInfo`".to_string()))?
        .as_object()
        .ok_or_else(|| EnrichmentError::Shape("`volumeInfo` is not an object".to_string()))?;

    Ok(Some(VolumeInfo(info).to_metadata()))
}

#[async_trait]
impl MetadataProvider for GoogleBooksClient {
    async fn fetch(&self, isbn: &str) -> Option<EnrichedMetadata> {
        tracing::debug!(isbn = %isbn, "Looking up book metadata");

        match self.lookup(isbn).await {
            Ok(Some(record)) => {
                record_enrichment_outcome("found");
                tracing::info!(isbn = %isbn, title = ?record.title, "Book metadata found");
                Some(record)
            }
            Ok(None) => {
                record_enrichment_outcome("not_found");
                tracing::info!(isbn = %isbn, "No volume found for ISBN");
                None
            }
            Err(e) => {
                record_enrichment_outcome(e.outcome());
                tracing::warn!(isbn = %isbn, kind = e.outcome(), error = %e, "Book metadata lookup failed");
                None
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "google_books"
    }
}
