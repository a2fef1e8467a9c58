//! Error types for the console client.
//!
//! The variants mirror the failure taxonomy the backend exposes: rule
//! violations, authorization denials, session loss, structural validation,
//! missing resources and everything else. Ambient failures (network, local
//! session database, configuration) get their own variants.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::BusinessRuleViolation;

/// Default text attached to a 403 response that carries no message.
pub const ACCESS_DENIED_MESSAGE: &str =
    "Access denied. You do not have permission to perform this action.";

/// Comprehensive error type for all console operations.
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// A business rule rejected the operation. Already published on the
    /// violation channel when it came from the backend.
    #[error("{0}")]
    RuleViolation(BusinessRuleViolation),
    /// The backend refused the action for the current user
    #[error("{message}")]
    AuthorizationDenied { message: String },
    /// The session could not be recovered; stored credentials were cleared
    #[error("Session terminated: {reason}. Please log in again")]
    SessionTerminated { reason: String },
    /// Structural input errors, detected locally or reported by the backend
    #[error("Invalid input for field '{field}': {reason}")]
    Validation { field: String, reason: String },
    /// The requested resource does not exist
    #[error("{message}")]
    NotFound { message: String },
    /// Any other backend failure
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },
    /// No response was received
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },
    /// Local session database errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> ConsoleError {
        ConsoleError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct ValidationErrorBuilder {
    field: String,
}

impl ValidationErrorBuilder {
    /// Create a new validation error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> ConsoleError {
        ConsoleError::Validation {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl ConsoleError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn validation(field: impl Into<String>) -> ValidationErrorBuilder {
        ValidationErrorBuilder::new(field)
    }

    /// Wraps a transport failure that produced no response.
    pub fn network(source: reqwest::Error) -> Self {
        Self::Network {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Returns the violation carried by this error, if any.
    pub fn violation(&self) -> Option<&BusinessRuleViolation> {
        match self {
            Self::RuleViolation(violation) => Some(violation),
            _ => None,
        }
    }

    /// True when the caller is expected to send the user back to login.
    pub fn is_session_terminated(&self) -> bool {
        matches!(self, Self::SessionTerminated { .. })
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| ConsoleError::database(message).with_source(e))
    }
}

/// Result type alias for console operations
pub type Result<T> = std::result::Result<T, ConsoleError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RuleRef;

    #[test]
    fn test_validation_builder() {
        let err = ConsoleError::validation("splitCount").with_reason("expected 3 quantities");
        assert_eq!(
            err.to_string(),
            "Invalid input for field 'splitCount': expected 3 quantities"
        );
    }

    #[test]
    fn test_violation_accessor() {
        let err = ConsoleError::RuleViolation(BusinessRuleViolation {
            rule: RuleRef::Server(101),
            message: "Backdate not allowed".to_string(),
            hint: None,
        });
        assert_eq!(err.violation().map(|v| v.rule), Some(RuleRef::Server(101)));
        assert!(!err.is_session_terminated());
    }

    #[test]
    fn test_api_error_display() {
        let err = ConsoleError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "boom (HTTP 500)");
    }
}
