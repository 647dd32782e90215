use std::collections::BTreeMap;

use thiserror::Error;

/// Validation messages grouped by the offending field
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String, fields: FieldErrors },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            fields: FieldErrors::new(),
        }
    }

    /// Validation failure carrying one or more per-field messages
    pub fn invalid_fields(fields: FieldErrors) -> Self {
        let names: Vec<&str> = fields.keys().map(String::as_str).collect();
        let message = format!("Invalid fields: {}", names.join(", "));

        Self::Validation { message, fields }
    }

    /// Validation failure for a single field
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field.into(), vec![message.into()]);
        Self::invalid_fields(fields)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Book 'abc' not found");
        assert_eq!(error.to_string(), "Not found: Book 'abc' not found");
    }

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Invalid input");
        assert_eq!(error.to_string(), "Validation error: Invalid input");
    }

    #[test]
    fn test_invalid_field_names_the_field() {
        let error = DomainError::invalid_field("isbn", "ISBN must be 10 or 13 digits long.");

        assert_eq!(error.to_string(), "Validation error: Invalid fields: isbn");

        match error {
            DomainError::Validation { fields, .. } => {
                assert_eq!(
                    fields.get("isbn"),
                    Some(&vec!["ISBN must be 10 or 13 digits long.".to_string()])
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_fields_lists_all_fields_sorted() {
        let mut fields = FieldErrors::new();
        fields.insert("title".to_string(), vec!["required".to_string()]);
        fields.insert("isbn".to_string(), vec!["bad".to_string()]);

        let error = DomainError::invalid_fields(fields);
        assert_eq!(error.to_string(), "Validation error: Invalid fields: isbn, title");
    }
}
