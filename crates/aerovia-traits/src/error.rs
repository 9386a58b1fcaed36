//! Error types for the aerovia pipeline.
//!
//! This module defines the error taxonomy used throughout the aerovia
//! workspace. Row-level defects are clipped, filled, or dropped by the
//! cleaning pipeline before they can abort a batch; only structural
//! defects (missing columns, unparsable schema) fail an entire load.

use thiserror::Error;

/// The main error type for aerovia operations.
///
/// This enum encompasses all error cases that can occur when loading,
/// cleaning, merging, and analyzing air-quality and ridership tables.
#[derive(Debug, Error)]
pub enum AeroviaError {
    /// Error due to invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A single row failed validation during ingestion.
    ///
    /// Carries the zero-based row index and the offending column so the
    /// caller can report or skip the record without losing the batch.
    #[error("Row {row}, column '{column}': {message}")]
    Validation {
        /// Zero-based index of the offending row.
        row: usize,
        /// Name of the offending column.
        column: String,
        /// Human-readable description of the defect.
        message: String,
    },

    /// A required column is missing from the input schema.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A date is unparsable or out of range.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Not enough data for the requested operation.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Failure fetching data from an external measurement provider.
    ///
    /// This variant never crosses the generator boundary: the generator
    /// falls back to the synthetic model on any fetch failure.
    #[error("Data fetch error: {0}")]
    Fetch(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl From<String> for AeroviaError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for AeroviaError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for aerovia operations.
///
/// This is a convenience type that uses [`AeroviaError`] as the error type.
pub type Result<T> = std::result::Result<T, AeroviaError>;
