//! ISBN value object

use serde::{Deserialize, Serialize};

use super::validation::BookValidationError;

/// Normalized ISBN: hyphens stripped, digits only, 10 or 13 long
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Isbn(String);

impl Isbn {
    /// Normalize and validate a user-supplied ISBN
    pub fn parse(raw: &str) -> Result<Self, BookValidationError> {
        let normalized: String = raw.trim().chars().filter(|c| *c != '-').collect();

        if normalized.is_empty() {
            return Err(BookValidationError::Required("isbn"));
        }

        if !normalized.chars().all(|c| c.is_ascii_digit()) {
            return Err(BookValidationError::IsbnNotNumeric);
        }

        if normalized.len() != 10 && normalized.len() != 13 {
            return Err(BookValidationError::IsbnLength);
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Isbn {
    type Error = BookValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Isbn> for String {
    fn from(isbn: Isbn) -> Self {
        isbn.0
    }
}

impl std::fmt::Display for Isbn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_hyphens() {
        let isbn = Isbn::parse("978-0-261-10221-7").unwrap();
        assert_eq!(isbn.as_str(), "9780261102217");
    }

    #[test]
    fn test_accepts_ten_and_thirteen_digits() {
        assert!(Isbn::parse("0261102214").is_ok());
        assert!(Isbn::parse("9780261102217").is_ok());
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert_eq!(Isbn::parse("12345"), Err(BookValidationError::IsbnLength));
        assert_eq!(Isbn::parse("97802611022170"), Err(BookValidationError::IsbnLength));
    }

    #[test]
    fn test_rejects_non_digits() {
        assert_eq!(Isbn::parse("invalid-isbn"), Err(BookValidationError::IsbnNotNumeric));
        assert_eq!(Isbn::parse("026110221X"), Err(BookValidationError::IsbnNotNumeric));
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(Isbn::parse(" - "), Err(BookValidationError::Required("isbn")));
    }

    #[test]
    fn test_serde_round_trip_validates() {
        let isbn: Isbn = serde_json::from_str("\"0-261-10221-4\"").unwrap();
        assert_eq!(isbn.as_str(), "0261102214");

        let bad: Result<Isbn, _> = serde_json::from_str("\"abc\"");
        assert!(bad.is_err());
    }
}
