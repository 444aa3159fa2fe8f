//! Presentation-facing payload types
//!
//! Everything here is an immutable value handed to a presenter: the
//! notifications the widget raises and the snapshot it renders from.

use serde::{Deserialize, Serialize};

use crate::bmi::{BmiResult, Category, Gauge};
use crate::history::{HistoryEntry, Trend};
use crate::theme::Theme;
use crate::units::UnitSystem;
use crate::validation::INVALID_INPUT_MESSAGE;

/// Event raised for the toast/notification collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    InvalidInput { message: String },
    CalculationSucceeded { value: f64, category: Category },
    HistoryCleared,
}

impl Notification {
    pub fn invalid_input() -> Self {
        Notification::InvalidInput {
            message: INVALID_INPUT_MESSAGE.to_string(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Notification::InvalidInput { .. } => "Invalid Input",
            Notification::CalculationSucceeded { .. } => "BMI Calculated!",
            Notification::HistoryCleared => "History Cleared",
        }
    }

    pub fn description(&self) -> String {
        match self {
            Notification::InvalidInput { message } => message.clone(),
            Notification::CalculationSucceeded { value, category } => {
                format!("Your BMI is {} ({})", value, category)
            }
            Notification::HistoryCleared => "Your BMI history has been cleared.".to_string(),
        }
    }

    /// Rendered with the destructive style
    pub fn is_error(&self) -> bool {
        matches!(self, Notification::InvalidInput { .. })
    }
}

/// Immutable view of the whole widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSnapshot {
    pub unit_system: UnitSystem,
    pub theme: Theme,
    /// A deferred calculation is pending; the submit action is disabled
    pub calculating: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<BmiResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gauge: Option<Gauge>,
    /// Most recent first
    pub history: Vec<HistoryEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
}
