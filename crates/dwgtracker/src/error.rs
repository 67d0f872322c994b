//! Error types for dwgtracker.
//!
//! This module defines all error types used throughout the dwgtracker crate,
//! covering storage failures, configuration problems, and the domain
//! rejections a form submission can produce.

use std::path::PathBuf;
use thiserror::Error;

use crate::record::RecordId;

/// The main error type for dwgtracker operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// The database was written by a newer, incompatible version.
    #[error("unsupported database schema version {found} (this build supports {supported})")]
    UnsupportedSchema {
        /// Version stamped in the database.
        found: String,
        /// Version this build writes.
        supported: i32,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Record Errors ===
    /// DWG Number or DWG Name was empty after trimming.
    #[error("DWG Number and DWG Name are required.")]
    MissingRequiredFields,

    /// Another record already uses the submitted DWG Number.
    #[error(
        "Another entry with the same DWG Number already exists. Please use a unique DWG Number. ({dwg_number})"
    )]
    DuplicateNumber {
        /// The conflicting number as submitted.
        dwg_number: String,
    },

    /// The record being edited is no longer in storage.
    #[error("Record not found. It may have been deleted. (id {id})")]
    RecordNotFound {
        /// The stale editing id.
        id: RecordId,
    },

    /// A status label could not be parsed.
    #[error("unknown status '{0}' (expected Planned, In Progress, Completed or Archived)")]
    InvalidStatus(String),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for dwgtracker operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a duplicate number error.
    #[must_use]
    pub fn duplicate_number(dwg_number: impl Into<String>) -> Self {
        Self::DuplicateNumber {
            dwg_number: dwg_number.into(),
        }
    }

    /// Check if this error is a rejected form submission rather than a
    /// storage or configuration failure.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::MissingRequiredFields | Self::DuplicateNumber { .. } | Self::InvalidStatus(_)
        )
    }

    /// Check if this error is a duplicate DWG Number conflict.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateNumber { .. })
    }

    /// Check if this error is a stale editing reference.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RecordNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_display() {
        let err = Error::MissingRequiredFields;
        assert_eq!(err.to_string(), "DWG Number and DWG Name are required.");
    }

    #[test]
    fn test_duplicate_number_display() {
        let err = Error::duplicate_number("A-100");
        let msg = err.to_string();
        assert!(msg.contains("same DWG Number"));
        assert!(msg.contains("A-100"));
    }

    #[test]
    fn test_record_not_found_display() {
        let err = Error::RecordNotFound {
            id: RecordId::new(42),
        };
        let msg = err.to_string();
        assert!(msg.contains("Record not found"));
        assert!(msg.contains("42"));
    }

    #[test]
    fn test_predicates() {
        assert!(Error::MissingRequiredFields.is_validation_error());
        assert!(Error::duplicate_number("X").is_validation_error());
        assert!(Error::duplicate_number("X").is_duplicate());
        assert!(!Error::MissingRequiredFields.is_duplicate());

        let stale = Error::RecordNotFound {
            id: RecordId::new(1),
        };
        assert!(stale.is_not_found());
        assert!(!stale.is_validation_error());
    }

    #[test]
    fn test_invalid_status_display() {
        let err = Error::InvalidStatus("Done".to_string());
        assert!(err.to_string().contains("'Done'"));
        assert!(err.is_validation_error());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_unsupported_schema_error_display() {
        let err = Error::UnsupportedSchema {
            found: "7".to_string(),
            supported: 1,
        };
        assert_eq!(
            err.to_string(),
            "unsupported database schema version 7 (this build supports 1)"
        );
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
