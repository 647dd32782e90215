//! Book field validation

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use super::entity::Book;
use super::isbn::Isbn;
use crate::domain::error::FieldErrors;

/// Maximum length for title and author
pub const MAX_TEXT_LENGTH: usize = 200;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors that can occur while validating book fields
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BookValidationError {
    #[error("This field is required.")]
    Required(&'static str),

    #[error("This field may not be blank.")]
    Blank(&'static str),

    #[error("Ensure this field has no more than {max} characters.")]
    TooLong { field: &'static str, max: usize },

    #[error("ISBN must contain only digits.")]
    IsbnNotNumeric,

    #[error("ISBN must be 10 or 13 digits long.")]
    IsbnLength,

    #[error("Date has wrong format. Use YYYY-MM-DD.")]
    InvalidDate,
}

impl BookValidationError {
    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            Self::Required(field) | Self::Blank(field) | Self::TooLong { field, .. } => field,
            Self::IsbnNotNumeric | Self::IsbnLength => "isbn",
            Self::InvalidDate => "published_date",
        }
    }
}

/// Writable book fields as submitted by a client, before validation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
}

/// Writable book fields after validation
#[derive(Debug, Clone, PartialEq)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub isbn: Isbn,
    pub description: String,
    pub published_date: NaiveDate,
}

impl BookInput {
    /// Fill every field the client left out with the book's current value
    pub fn merged_onto(self, book: &Book) -> Self {
        Self {
            title: self.title.or_else(|| Some(book.title().to_string())),
            author: self.author.or_else(|| Some(book.author().to_string())),
            isbn: self.isbn.or_else(|| Some(book.isbn().to_string())),
            description: self.description.or_else(|| Some(book.description().to_string())),
            published_date: self
                .published_date
                .or_else(|| Some(book.published_date().format(DATE_FORMAT).to_string())),
        }
    }

    /// Validate every field, collecting all failures rather than stopping at the first
    pub fn validate(&self) -> Result<BookFields, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = collect(&mut errors, validate_text("title", self.title.as_deref()));
        let author = collect(&mut errors, validate_text("author", self.author.as_deref()));
        let isbn = collect(
            &mut errors,
            self.isbn
                .as_deref()
                .ok_or(BookValidationError::Required("isbn"))
                .and_then(Isbn::parse),
        );
        let published_date = collect(
            &mut errors,
            parse_published_date(self.published_date.as_deref()),
        );

        match (title, author, isbn, published_date) {
            (Some(title), Some(author), Some(isbn), Some(published_date)) if errors.is_empty() => {
                Ok(BookFields {
                    title,
                    author,
                    isbn,
                    description: self.description.clone().unwrap_or_default(),
                    published_date,
                })
            }
            _ => Err(errors),
        }
    }
}

fn collect<T>(errors: &mut FieldErrors, result: Result<T, BookValidationError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            errors
                .entry(e.field().to_string())
                .or_default()
                .push(e.to_string());
            None
        }
    }
}

/// Validate a required, bounded text field
pub fn validate_text(
    field: &'static str,
    value: Option<&str>,
) -> Result<String, BookValidationError> {
    let value = value.ok_or(BookValidationError::Required(field))?.trim();

    if value.is_empty() {
        return Err(BookValidationError::Blank(field));
    }

    if value.chars().count() > MAX_TEXT_LENGTH {
        return Err(BookValidationError::TooLong {
            field,
            max: MAX_TEXT_LENGTH,
        });
    }

    Ok(value.to_string())
}

/// Parse a `YYYY-MM-DD` publication date
pub fn parse_published_date(value: Option<&str>) -> Result<NaiveDate, BookValidationError> {
    let value = value.ok_or(BookValidationError::Required("published_date"))?;

    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| BookValidationError::InvalidDate)
}
