//! Application error handling
//!
//! Unifies configuration, storage and controller failures for the host and
//! maps each to the line printed back to the user.

use bmi_calculator_shared::{CalculatorError, StorageError};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Calculator(#[from] CalculatorError),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Text shown to the user for this error
    pub fn user_message(&self) -> String {
        match self {
            AppError::Calculator(CalculatorError::Busy) => "Calculating... please wait.".to_string(),
            AppError::Calculator(CalculatorError::NotPending) => "Nothing to cancel.".to_string(),
            AppError::InvalidCommand(msg) => format!("{} (type 'help' for commands)", msg),
            AppError::Config(_) | AppError::Storage(_) | AppError::Io(_) | AppError::Internal(_) => {
                error!("Internal error: {:?}", self);
                "An internal error occurred".to_string()
            }
        }
    }
}

/// Result type alias for host operations
pub type AppResult<T> = Result<T, AppError>;
