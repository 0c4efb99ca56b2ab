//! Error types for polarway-forms — Railway Programming
//!
//! All operations return `Result<T, FormsError>`.
//! No panics, no unwraps in production code paths.

use std::path::Path;

use thiserror::Error;

/// Unified error type for credential, record, and session operations
#[derive(Error, Debug)]
pub enum FormsError {
    // ─── Startup Errors ───

    #[error("Credential file unavailable ({path}): {reason}")]
    ConfigUnavailable { path: String, reason: String },

    // ─── Auth Errors ───

    #[error("Authentication failed: {0}")]
    AuthenticationFailure(String),

    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Incomplete input: {0}")]
    IncompleteInput(String),

    #[error("Insufficient permissions: required={required}, have={actual}")]
    AccessDenied { required: String, actual: String },

    // ─── Storage Errors ───

    #[error("Storage write failed: {0}")]
    StorageWriteFailure(String),

    #[error("Schema mismatch: expected {expected}, got {actual}")]
    SchemaMismatch { expected: String, actual: String },

    // ─── Infrastructure Errors ───

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(String),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Actor unavailable: {0}")]
    ActorUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FormsError {
    pub(crate) fn config_unavailable(path: &Path, reason: impl std::fmt::Display) -> Self {
        FormsError::ConfigUnavailable {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Only a missing or malformed credential file ends the session
    pub fn is_fatal(&self) -> bool {
        matches!(self, FormsError::ConfigUnavailable { .. })
    }

    /// Failures worth another write attempt (file briefly locked, disk hiccup)
    pub fn is_transient(&self) -> bool {
        matches!(self, FormsError::Io(_))
    }
}

impl From<serde_yaml::Error> for FormsError {
    fn from(err: serde_yaml::Error) -> Self {
        FormsError::Yaml(err.to_string())
    }
}

impl From<calamine::XlsxError> for FormsError {
    fn from(err: calamine::XlsxError) -> Self {
        match err {
            calamine::XlsxError::Io(e) => FormsError::Io(e),
            other => FormsError::Spreadsheet(other.to_string()),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for FormsError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        FormsError::Spreadsheet(err.to_string())
    }
}

impl From<argon2::password_hash::Error> for FormsError {
    fn from(err: argon2::password_hash::Error) -> Self {
        FormsError::PasswordHash(err.to_string())
    }
}

impl From<tempfile::PersistError> for FormsError {
    fn from(err: tempfile::PersistError) -> Self {
        FormsError::Io(err.error)
    }
}

/// Result type alias for forms operations
pub type Result<T> = std::result::Result<T, FormsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_config_unavailable_is_fatal() {
        let fatal = FormsError::config_unavailable(Path::new("config.yaml"), "missing");
        assert!(fatal.is_fatal());
        assert!(!FormsError::DuplicateUsername("alice".into()).is_fatal());
        assert!(!FormsError::StorageWriteFailure("locked".into()).is_fatal());
    }

    #[test]
    fn test_transient_errors() {
        let io = FormsError::Io(std::io::Error::new(std::io::ErrorKind::Other, "busy"));
        assert!(io.is_transient());
        let schema = FormsError::SchemaMismatch {
            expected: "Name, Gender".into(),
            actual: "Email".into(),
        };
        assert!(!schema.is_transient());
    }
}
