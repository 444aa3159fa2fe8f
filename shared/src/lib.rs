//! BMI Calculator Shared Library
//!
//! The widget core: unit conversion, BMI computation and classification,
//! health tips, the capped history log, theme preference and the controller
//! that ties them together. Used by the native host and the WASM bindings.

pub mod bmi;
pub mod calculator;
pub mod errors;
pub mod faq;
pub mod history;
pub mod storage;
pub mod theme;
pub mod tips;
pub mod types;
pub mod units;
pub mod validation;

// Re-export commonly used items
pub use bmi::*;
pub use calculator::Calculator;
pub use errors::*;
pub use history::{HistoryEntry, HistoryLog, Trend, HISTORY_CAPACITY};
pub use storage::{KeyValueStore, MemoryStore, HISTORY_KEY, THEME_KEY};
pub use theme::Theme;
pub use tips::tips_for;
pub use types::*;
pub use units::*;
