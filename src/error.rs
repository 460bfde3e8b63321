// src/error.rs
use thiserror::Error;

use crate::validation::ValidationError;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, PdnsError>;

#[derive(Debug, Error)]
pub enum PdnsError {
    #[error("code={status_code} {url}: {message}")]
    Api {
        url: String,
        status_code: u16,
        message: String,
    },

    #[error("code=404 {url}: Not found")]
    NotFound { url: String },

    #[error("'{name}' is not canonical")]
    NotCanonical { name: String },

    #[error("invalid record: {0}")]
    Validation(#[from] ValidationError),

    #[error("zone not found: {name}")]
    ZoneNotFound { name: String },

    #[error("missing field '{field}' in {context}")]
    MissingField {
        field: &'static str,
        context: String,
    },

    #[error("empty response from {url}")]
    EmptyResponse { url: String },

    #[error("http transport failure")]
    Http(#[from] reqwest::Error),

    #[error("malformed json payload")]
    Json(#[from] serde_json::Error),

    #[error("i/o failure")]
    Io(#[from] std::io::Error),
}

impl PdnsError {
    pub fn not_canonical(name: impl Into<String>) -> Self {
        PdnsError::NotCanonical { name: name.into() }
    }

    pub fn missing_field(field: &'static str, context: impl Into<String>) -> Self {
        PdnsError::MissingField {
            field,
            context: context.into(),
        }
    }

    /// HTTP status behind the error, when the server produced one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            PdnsError::Api { status_code, .. } => Some(*status_code),
            PdnsError::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PdnsError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = PdnsError::Api {
            url: "/fake-url".into(),
            status_code: 422,
            message: "Conflict".into(),
        };
        assert_eq!(err.to_string(), "code=422 /fake-url: Conflict");
        assert_eq!(err.status_code(), Some(422));
        assert!(!err.is_not_found());
    }

    #[test]
    fn not_found_reports_404() {
        let err = PdnsError::NotFound {
            url: "/fake-url".into(),
        };
        assert_eq!(err.to_string(), "code=404 /fake-url: Not found");
        assert_eq!(err.status_code(), Some(404));
        assert!(err.is_not_found());
    }

    #[test]
    fn canonical_error_carries_name() {
        let err = PdnsError::not_canonical("fake-name.tld");
        assert_eq!(err.to_string(), "'fake-name.tld' is not canonical");
        match err {
            PdnsError::NotCanonical { name } => assert_eq!(name, "fake-name.tld"),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
