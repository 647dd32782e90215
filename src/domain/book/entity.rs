//! Book entity and identifier

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::isbn::Isbn;
use super::validation::BookFields;
use crate::domain::enrichment::EnrichedMetadata;
use crate::domain::DomainError;

/// Book identifier (UUID v4 string)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Parse an identifier received from a client
    pub fn parse(id: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(id)
            .map(|uuid| Self(uuid.to_string()))
            .map_err(|_| DomainError::not_found(format!("Book '{}' not found", id)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Book entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    id: BookId,
    title: String,
    author: String,
    isbn: Isbn,
    #[serde(default)]
    description: String,
    published_date: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    enriched_data: Option<EnrichedMetadata>,
}

impl Book {
    /// Create a new book from validated fields
    pub fn new(fields: BookFields) -> Self {
        let now = Utc::now();

        Self {
            id: BookId::generate(),
            title: fields.title,
            author: fields.author,
            isbn: fields.isbn,
            description: fields.description,
            published_date: fields.published_date,
            created_at: now,
            updated_at: now,
            enriched_data: None,
        }
    }

    /// Rebuild a stored book without touching its timestamps
    pub fn restore(
        id: BookId,
        fields: BookFields,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        enriched_data: Option<EnrichedMetadata>,
    ) -> Self {
        Self {
            id,
            title: fields.title,
            author: fields.author,
            isbn: fields.isbn,
            description: fields.description,
            published_date: fields.published_date,
            created_at,
            updated_at,
            enriched_data,
        }
    }

    // Getters

    pub fn id(&self) -> &BookId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn published_date(&self) -> NaiveDate {
        self.published_date
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn enriched_data(&self) -> Option<&EnrichedMetadata> {
        self.enriched_data.as_ref()
    }

    // Mutations

    /// Replace all writable fields
    pub fn apply(&mut self, fields: BookFields) {
        self.title = fields.title;
        self.author = fields.author;
        self.isbn = fields.isbn;
        self.description = fields.description;
        self.published_date = fields.published_date;
        self.touch();
    }

    /// Replace the enrichment payload wholesale
    pub fn update_enriched_data(&mut self, data: EnrichedMetadata) {
        self.enriched_data = Some(data);
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} by {}", self.title, self.author)
    }
}
