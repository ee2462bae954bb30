//! Persistence error types.
//!
//! All persistence operations return structured errors that provide
//! user-friendly messages and optional remediation hints.

use std::path::PathBuf;

use thiserror::Error;

/// Persistence operation error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PersistenceError {
    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a prototype document or library bucket.
    #[error("Invalid file format: {path}")]
    InvalidFormat { path: PathBuf, reason: String },

    /// Document written by a newer version.
    #[error("Document version {found} is not supported (maximum: {max_supported})")]
    UnsupportedVersion {
        found: u32,
        max_supported: u32,
        path: PathBuf,
    },

    /// A saved composition needs a non-blank display name.
    #[error("Saved composition name must not be blank")]
    BlankName,

    /// Serialization error.
    #[error("Failed to serialize data")]
    Serialization {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Deserialization error.
    #[error("Failed to deserialize data")]
    Deserialization {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PersistenceError {
    pub(crate) fn serialization(source: serde_json::Error) -> Self {
        Self::Serialization {
            source: Box::new(source),
        }
    }

    pub(crate) fn deserialization(source: serde_json::Error) -> Self {
        Self::Deserialization {
            source: Box::new(source),
        }
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => {
                format!("Could not {} the file at {}", operation, path.display())
            }
            Self::InvalidFormat { path, reason } => {
                format!(
                    "The file at {} is not a valid prototype file: {}",
                    path.display(),
                    reason
                )
            }
            Self::UnsupportedVersion {
                found,
                max_supported,
                ..
            } => {
                format!(
                    "This prototype was saved by a newer version of the studio \
                    (document version {found}, this version supports up to {max_supported})."
                )
            }
            Self::BlankName => "Give the saved component a name.".to_string(),
            Self::Serialization { .. } => "An error occurred while writing the data.".to_string(),
            Self::Deserialization { .. } => {
                "An error occurred while reading stored data. It may be corrupted.".to_string()
            }
            Self::AtomicWriteFailed { target_path, .. } => {
                format!(
                    "Could not save the file to {}. Please check disk space and permissions.",
                    target_path.display()
                )
            }
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the file exists and you have permission to read it.".into())
                } else {
                    Some("Check that you have permission to write to this location.".into())
                }
            }
            Self::InvalidFormat { .. } => {
                Some("Make sure the path points to a prototype JSON document.".into())
            }
            Self::UnsupportedVersion { .. } => Some("Update the studio to open this file.".into()),
            Self::BlankName => None,
            Self::Serialization { .. } => None,
            Self::Deserialization { .. } => Some("Try restoring a backup if you have one.".into()),
            Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space or try saving to a different location.".into())
            }
        }
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
