// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AlephError>;

#[derive(Error, Debug)]
pub enum AlephError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The request never produced an HTTP response.
    #[error("Transport error, failed to {context}: {source}")]
    Transport {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered outside the 2xx range.
    #[error("Failed to {context}: HTTP {status}")]
    Remote {
        context: &'static str,
        status: u16,
        body: String,
    },

    /// The body decoded but did not have the expected top-level layout.
    #[error("Invalid response format: {0}")]
    Shape(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AlephError {
    /// HTTP status carried by a `Remote` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            AlephError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_shape(&self) -> bool {
        matches!(self, AlephError::Shape(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_keeps_status() {
        let err = AlephError::Remote {
            context: "search entities",
            status: 403,
            body: "forbidden".to_string(),
        };

        assert_eq!(err.status(), Some(403));
        assert_eq!(err.to_string(), "Failed to search entities: HTTP 403");
        assert!(!err.is_shape());
    }

    #[test]
    fn test_shape_error_has_no_status() {
        let err = AlephError::Shape("expected 'results' array".to_string());
        assert_eq!(err.status(), None);
        assert!(err.is_shape());
    }
}
