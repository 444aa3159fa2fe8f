//! Error types for the BMI calculator core

use std::fmt;
use thiserror::Error;

use crate::validation::{get_field_display_label, INVALID_INPUT_MESSAGE};

/// Form field that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Height in centimeters (metric) or feet (imperial)
    Height,
    /// Weight in kilograms (metric) or pounds (imperial)
    Weight,
}

impl Field {
    /// Technical field name
    pub fn name(&self) -> &'static str {
        match self {
            Field::Height => "height",
            Field::Weight => "weight",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", get_field_display_label(self.name()))
    }
}

/// Why a field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// Empty, unparsable, NaN or infinite
    NotANumber,
    /// Zero or negative
    NotPositive,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::NotANumber => write!(f, "must be a number"),
            InvalidReason::NotPositive => write!(f, "must be greater than zero"),
        }
    }
}

/// Input validation failure
///
/// Always recoverable: the submission is aborted and nothing is mutated.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: Field,
    pub reason: InvalidReason,
}

impl ValidationError {
    pub fn new(field: Field, reason: InvalidReason) -> Self {
        Self { field, reason }
    }

    /// Fixed message shown to the user regardless of which field failed
    pub fn user_message(&self) -> &'static str {
        INVALID_INPUT_MESSAGE
    }
}

/// Key-value store errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Malformed stored value under '{key}': {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Widget controller errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculatorError {
    #[error("A calculation is already in progress")]
    Busy,

    #[error("No calculation is pending")]
    NotPending,
}
