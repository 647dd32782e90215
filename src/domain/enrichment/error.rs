//! Enrichment failure taxonomy

use thiserror::Error;

/// Reasons a metadata lookup produced nothing usable
///
/// None of these leave the enrichment subsystem. They exist so operators can
/// tell a network outage from an API shape change in logs and metrics.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected HTTP status {status}")]
    Status { status: u16 },

    #[error("malformed JSON body: {0}")]
    Parse(String),

    #[error("unexpected payload shape: {0}")]
    Shape(String),
}

impl EnrichmentError {
    /// Stable label used for the `outcome` metric dimension
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport_error",
            Self::Status { .. } => "status_error",
            Self::Parse(_) => "parse_error",
            Self::Shape(_) => "shape_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        assert_eq!(EnrichmentError::Transport("x".into()).outcome(), "transport_error");
        assert_eq!(EnrichmentError::Status { status: 503 }.outcome(), "status_error");
        assert_eq!(EnrichmentError::Parse("x".into()).outcome(), "parse_error");
        assert_eq!(EnrichmentError::Shape("x".into()).outcome(), "shape_error");
    }

    #[test]
    fn test_display() {
        let err = EnrichmentError::Status { status: 503 };
        assert_eq!(err.to_string(), "unexpected HTTP status 503");
    }
}
