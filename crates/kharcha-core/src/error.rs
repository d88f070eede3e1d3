//! Error types for the kharcha-core library.
//!
//! Failing to find an amount is not an error: extractors return `None` for that.
//! These types cover configuration, I/O and record invariant violations.

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the kharcha library.
#[derive(Error, Debug)]
pub enum KharchaError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Expense record validation error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to pipeline configuration.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    /// A numeric range has its bounds swapped or equal.
    #[error("invalid range for {field}: min {min} must be below max {max}")]
    InvalidRange {
        field: &'static str,
        min: Decimal,
        max: Decimal,
    },

    /// The mask placeholder could be mistaken for an amount.
    #[error("mask placeholder {0:?} must be non-empty and contain no digits")]
    InvalidPlaceholder(String),

    /// A confusable digit entry is not an ASCII digit.
    #[error("confusable digit {0:?} is not an ASCII digit")]
    InvalidConfusableDigit(char),

    /// A threshold is outside its allowed interval.
    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfBounds {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}

/// Violations of the `ParsedExpense` invariants.
#[derive(Error, Debug, PartialEq)]
pub enum ExtractionError {
    /// Amount must be strictly positive.
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Confidence must lie in [0, 1].
    #[error("confidence must be within [0, 1], got {0}")]
    ConfidenceOutOfRange(f32),

    /// A required text field was empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Result type for the kharcha library.
pub type Result<T> = std::result::Result<T, KharchaError>;
