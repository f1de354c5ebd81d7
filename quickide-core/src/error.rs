//! # Error handling for Quick IDE Core
//!
//! This module provides the error taxonomy shared by every component of the
//! addon toolchain: project store, document generation, pack writing and
//! export. All fallible operations return [`Result`], and every error is
//! reported synchronously to the action that triggered it.

use crate::schema::PackSide;
use thiserror::Error;

/// Result type used throughout Quick IDE Core.
///
/// # Example
///
/// ```rust
/// use quickide_core::{Result, Error};
///
/// fn example_function() -> Result<String> {
///     Ok("Success".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Quick IDE Core.
#[derive(Error, Debug)]
pub enum Error {
    /// A form field is missing, malformed, or a required collection is empty
    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    /// JSON text failed to parse before being written
    #[error("Invalid document: {message}")]
    InvalidDocument { message: String },

    /// Already exists errors
    #[error("Already exists: {resource}")]
    AlreadyExists { resource: String },

    /// Not found errors
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// A project is missing one or both pack subtrees
    #[error("Incomplete project structure: '{project}' is missing {}", format_sides(.missing))]
    IncompleteStructure {
        project: String,
        missing: Vec<PackSide>,
    },

    /// Archive export failed
    #[error("Export failed: {0}")]
    Export(#[source] Box<Error>),

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// File I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// ZIP file handling errors
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Directory walk errors
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Generic error with custom message
    #[error("Error: {message}")]
    Generic { message: String },
}

fn format_sides(sides: &[PackSide]) -> String {
    sides
        .iter()
        .map(|side| side.dir_name())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// Create a new validation error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use quickide_core::Error;
    ///
    /// let error = Error::validation("identifier", "required field is missing");
    /// assert!(error.is_validation());
    /// ```
    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new invalid document error.
    pub fn invalid_document<S: Into<String>>(message: S) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }

    /// Create a new already exists error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use quickide_core::Error;
    ///
    /// let error = Error::already_exists("Project 'Demo'");
    /// assert_eq!(error.category(), "AlreadyExists");
    /// ```
    pub fn already_exists<S: Into<String>>(resource: S) -> Self {
        Self::AlreadyExists {
            resource: resource.into(),
        }
    }

    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a new incomplete structure error.
    pub fn incomplete_structure<S: Into<String>>(project: S, missing: Vec<PackSide>) -> Self {
        Self::IncompleteStructure {
            project: project.into(),
            missing,
        }
    }

    /// Wrap an underlying failure as an export error.
    pub fn export(source: Error) -> Self {
        Self::Export(Box::new(source))
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new generic error.
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if this error is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this error is an invalid document error.
    pub fn is_invalid_document(&self) -> bool {
        matches!(self, Self::InvalidDocument { .. })
    }

    /// Check if this error is a not found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error is an already exists error.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// Check if this error signals a repairable project structure.
    pub fn is_incomplete_structure(&self) -> bool {
        matches!(self, Self::IncompleteStructure { .. })
    }

    /// Check if this error is an I/O error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use quickide_core::Error;
    /// use std::io;
    ///
    /// let error = Error::Io(io::Error::new(io::ErrorKind::NotFound, "File not found"));
    /// assert!(error.is_io());
    /// ```
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    /// Name of the field a validation error refers to.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Get the error category as a string.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "Validation",
            Self::InvalidDocument { .. } => "InvalidDocument",
            Self::AlreadyExists { .. } => "AlreadyExists",
            Self::NotFound { .. } => "NotFound",
            Self::IncompleteStructure { .. } => "IncompleteStructure",
            Self::Export(_) => "Export",
            Self::Config { .. } => "Config",
            Self::Io(_) => "IO",
            Self::Json(_) => "JSON",
            Self::Toml(_) => "TOML",
            Self::Zip(_) => "ZIP",
            Self::Walk(_) => "Walk",
            Self::Generic { .. } => "Generic",
        }
    }
}

/// Convenience macro for creating errors with context.
///
/// # Example
///
/// ```rust
/// use quickide_core::{error, Error};
///
/// let err = error!("Failed to read {}: {}", "manifest.json", "Permission denied");
/// assert_eq!(err.category(), "Generic");
/// ```
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::Error::generic(format!($($arg)*))
    };
}

/// Convenience macro for creating configuration errors.
///
/// # Example
///
/// ```rust
/// use quickide_core::{config_error, Error};
///
/// let err = config_error!("Invalid value for {}: {}", "logging.level", "loud");
/// assert_eq!(err.category(), "Config");
/// ```
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::Error::config(format!($($arg)*))
    };
}
