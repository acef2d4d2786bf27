//! Error types for thesaur.

use thiserror::Error;

/// Result type alias using thesaur's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for thesaur operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A single-subject materialization found more than one subject.
    #[error("Ambiguous result: expected a single subject, found {found} ({subjects})")]
    AmbiguousResult {
        /// Number of distinct subjects found.
        found: usize,
        /// Comma-separated subject keys, for diagnostics.
        subjects: String,
    },

    /// The triple store failed while running a query.
    #[error("Query execution failed ({context}): {message}")]
    QueryExecution {
        /// Which query was running and for what (phase, URI).
        context: String,
        /// Message reported by the triple store.
        message: String,
    },

    /// Search parameters violate their preconditions.
    #[error("Invalid search parameters: {0}")]
    InvalidSearchParameters(String),

    /// Configuration error (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a query execution failure with context.
    pub fn query(context: impl Into<String>, message: impl Into<String>) -> Self {
        Error::QueryExecution {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Re-wrap a store-level failure with additional context.
    ///
    /// Any error becomes a `QueryExecution`; an existing `QueryExecution`
    /// keeps its message and gets the new context prepended.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        let context = context.into();
        match self {
            Error::QueryExecution {
                context: inner,
                message,
            } => Error::QueryExecution {
                context: format!("{}: {}", context, inner),
                message,
            },
            other => Error::QueryExecution {
                context,
                message: other.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_ambiguous_result() {
        let err = Error::AmbiguousResult {
            found: 2,
            subjects: "http://ex.org/a, http://ex.org/b".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Ambiguous result: expected a single subject, found 2 (http://ex.org/a, http://ex.org/b)"
        );
    }

    #[test]
    fn test_error_display_query_execution() {
        let err = Error::query("search count", "connection refused");
        assert_eq!(
            err.to_string(),
            "Query execution failed (search count): connection refused"
        );
    }

    #[test]
    fn test_error_display_invalid_search_parameters() {
        let err = Error::InvalidSearchParameters("page size must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid search parameters: page size must be positive"
        );
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("bad widths".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad widths");
    }

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("http://ex.org/c1".to_string());
        assert_eq!(err.to_string(), "Not found: http://ex.org/c1");
    }

    #[test]
    fn test_with_context_wraps_other_errors() {
        let err = Error::Request("timed out".to_string()).with_context("concept http://ex.org/c1");
        match err {
            Error::QueryExecution { context, message } => {
                assert_eq!(context, "concept http://ex.org/c1");
                assert_eq!(message, "Request error: timed out");
            }
            _ => panic!("Expected QueryExecution error"),
        }
    }

    #[test]
    fn test_with_context_keeps_store_message() {
        let err = Error::query("graph query", "syntax error").with_context("load scheme");
        match err {
            Error::QueryExecution { context, message } => {
                assert_eq!(context, "load scheme: graph query");
                assert_eq!(message, "syntax error");
            }
            _ => panic!("Expected QueryExecution error"),
        }
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number");
        assert!(json_err.is_err());

        let err: Error = json_err.unwrap_err().into();
        match err {
            Error::Serialization(msg) => {
                assert!(!msg.is_empty());
            }
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_from_toml_error() {
        let toml_err = toml::from_str::<toml::Value>("= broken");
        assert!(toml_err.is_err());

        let err: Error = toml_err.unwrap_err().into();
        assert!(err.to_string().starts_with("Configuration error:"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        match err {
            Error::Io(_) => {} // Success
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
