//! Error types for document merging.
//!
//! Errors are grouped into categories so the command line can decide what
//! to tell the operator. Fatal conditions (missing files, missing top-level
//! keys, unparsable documents) abort before anything is written; per-item
//! conditions inside the merge loops are logged and never surface here.

use std::path::PathBuf;
use thiserror::Error;

use crate::path::PathError;
use crate::update::Role;

/// Categories of merge errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A required top-level key is missing from a document
    Structural,
    /// A source or target file does not exist
    NotFound,
    /// A path expression is malformed or cannot be followed
    Path,
    /// A document could not be parsed
    Parse,
    /// The merged document could not be persisted
    Write,
    /// The operating settings have the wrong shape
    Settings,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Whether the merge result is still available after this error.
    ///
    /// Only write failures happen after a complete merge.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Write)
    }

    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Structural => "Document structure is invalid",
            Self::NotFound => "File not found",
            Self::Path => "Invalid path expression",
            Self::Parse => "Document could not be parsed",
            Self::Write => "Could not write target file",
            Self::Settings => "Invalid settings",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Structural => "Add the missing top-level key to the document",
            Self::NotFound => "Check the --source and --target paths",
            Self::Path => "Paths use the bracketed form [a][b][c]",
            Self::Parse => "Fix the syntax error reported above",
            Self::Write => {
                "Make sure the target file has correct writing permissions, \
                 or try --dry-run to dump the full content"
            }
            Self::Settings => "Check the composer-utilities section of your settings file",
            Self::Other => "Check the error details for more information",
        }
    }
}

/// Errors that can occur while loading, merging or saving documents.
#[derive(Debug, Error)]
pub enum Error {
    /// A required top-level key is missing or is not a mapping
    #[error("the top-level key {key} is missing or invalid in {role} {}", file.display())]
    Structural {
        /// Which document failed validation
        role: Role,
        /// The missing key
        key: String,
        /// File the document was read from
        file: PathBuf,
    },

    /// File does not exist
    #[error("file {} does not exist", .0.display())]
    NotFound(PathBuf),

    /// Path expression error
    #[error(transparent)]
    Path(#[from] PathError),

    /// Document could not be parsed
    #[error("failed to parse {}: {message}", path.display())]
    Parse {
        /// File being parsed
        path: PathBuf,
        /// Parser message, including the location when known
        message: String,
    },

    /// Document could not be written
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Target file
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Settings value has the wrong shape
    #[error("invalid setting {path}: {message}")]
    Settings {
        /// Bracketed location of the setting inside the namespace
        path: String,
        /// What was expected
        message: String,
    },

    /// Operator answer was rejected or the prompt failed
    #[error("{0}")]
    Prompt(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Structural { .. } => ErrorCategory::Structural,
            Error::NotFound(_) => ErrorCategory::NotFound,
            Error::Path(_) => ErrorCategory::Path,
            Error::Parse { .. } | Error::Json(_) | Error::Yaml(_) => ErrorCategory::Parse,
            Error::Write { .. } => ErrorCategory::Write,
            Error::Settings { .. } => ErrorCategory::Settings,
            Error::Prompt(_) | Error::Io(_) => ErrorCategory::Other,
        }
    }

    pub(crate) fn settings(path: &str, message: impl Into<String>) -> Self {
        Error::Settings {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

/// Result type for merge operations.
pub type Result<T> = std::result::Result<T, Error>;
