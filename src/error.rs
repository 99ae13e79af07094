//! Error types for rql.

use thiserror::Error;

/// The main error type for rql operations.
#[derive(Debug, Error)]
pub enum RqlError {
    /// The raw query string could not be decoded at all.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// A filter was refused under the strict filter policy.
    #[error("Rejected filter '{key}': {reason}")]
    RejectedFilter { key: String, reason: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error.
    #[error("Execution error: {0}")]
    Execution(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RqlError {
    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Create a strict-policy rejection for a filter key.
    pub fn rejected(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RejectedFilter {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error was caused by the client's query string.
    ///
    /// HTTP callers answer these with a 400.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::RejectedFilter { .. })
    }
}

/// Result type alias for rql operations.
pub type RqlResult<T> = Result<T, RqlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RqlError::parse(5, "truncated percent escape");
        assert_eq!(
            err.to_string(),
            "Parse error at position 5: truncated percent escape"
        );
    }

    #[test]
    fn test_rejected_display() {
        let err = RqlError::rejected("filters[secret:eq]", "field is not filterable");
        assert_eq!(
            err.to_string(),
            "Rejected filter 'filters[secret:eq]': field is not filterable"
        );
    }

    #[test]
    fn test_client_error_classification() {
        assert!(RqlError::parse(0, "x").is_client_error());
        assert!(RqlError::rejected("k", "r").is_client_error());
        assert!(!RqlError::Execution("boom".into()).is_client_error());
    }
}
