//! Custom error types for profiling, scoring and cleaning.
//!
//! This module provides the error hierarchy using `thiserror`. Errors carry
//! structured information (kind plus offending column or field) and are
//! serializable so a caller can forward them to an API or UI layer.

use crate::config::ConfigValidationError;
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the crate.
#[derive(Error, Debug)]
pub enum TabcleanError {
    /// A dataset violated a construction invariant.
    #[error("Malformed dataset (column '{column}'): {reason}")]
    MalformedDataset { column: String, reason: String },

    /// Cleaning options failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigValidationError),

    /// No reader is registered for the extension.
    #[error("Unsupported format: no reader registered for extension '{0}'")]
    UnsupportedFormat(String),

    /// A reader failed to turn a file into a dataset.
    #[error("Failed to ingest '{path}': {reason}")]
    Ingestion { path: String, reason: String },

    /// No stored dataset exists for the identity.
    #[error("Dataset '{0}' not found")]
    DatasetNotFound(String),

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<TabcleanError>,
    },
}

impl TabcleanError {
    /// Shorthand for a [`TabcleanError::MalformedDataset`].
    pub fn malformed(column: impl Into<String>, reason: impl Into<String>) -> Self {
        TabcleanError::MalformedDataset {
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        TabcleanError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for callers that translate errors into
    /// user-facing messages.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedDataset { .. } => "MALFORMED_DATASET",
            Self::InvalidConfiguration(_) => "INVALID_CONFIGURATION",
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::Ingestion { .. } => "INGESTION_FAILED",
            Self::DatasetNotFound(_) => "DATASET_NOT_FOUND",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// The column or configuration field the error points at, if any.
    pub fn offending_field(&self) -> Option<&str> {
        match self {
            Self::MalformedDataset { column, .. } => Some(column),
            Self::InvalidConfiguration(e) => Some(e.field()),
            Self::ColumnNotFound(column) => Some(column),
            Self::WithContext { source, .. } => source.offending_field(),
            _ => None,
        }
    }

    /// Check if the caller can fix the error by changing its input.
    ///
    /// None of the errors are retried internally; every computation is
    /// deterministic.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidConfiguration(_)
            | Self::UnsupportedFormat(_)
            | Self::DatasetNotFound(_)
            | Self::ColumnNotFound(_) => true,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code`, `field` and `message`.
impl Serialize for TabcleanError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("TabcleanError", 3)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("field", &self.offending_field())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for crate operations.
pub type Result<T> = std::result::Result<T, TabcleanError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| TabcleanError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| TabcleanError::Io(e).with_context(context))
    }
}
