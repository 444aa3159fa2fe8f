//! Input validation functions
//!
//! Form fields arrive as raw strings. They are parsed here into numbers and
//! checked for positivity before any unit conversion happens.

use crate::errors::{Field, InvalidReason, ValidationError};

/// Message shown for every rejected submission
pub const INVALID_INPUT_MESSAGE: &str = "Please enter valid height and weight values.";

/// Parse a numeric form field
///
/// Returns NaN for empty or unparsable input so that downstream validation
/// rejects it the same way it rejects a non-finite number.
pub fn parse_number(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Parse the optional inches field
///
/// Missing, unparsable, non-finite or negative values become 0.
pub fn parse_optional_inches(raw: Option<&str>) -> f64 {
    raw.map(parse_number)
        .filter(|inches| inches.is_finite() && *inches >= 0.0)
        .unwrap_or(0.0)
}

/// Validate a required measurement value: finite and strictly positive
pub fn validate_positive(field: Field, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new(field, InvalidReason::NotANumber));
    }
    if value <= 0.0 {
        return Err(ValidationError::new(field, InvalidReason::NotPositive));
    }
    Ok(value)
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "height" | "height_cm" => "Height",
        "feet" => "Feet",
        "inches" => "Inches",
        "weight" => "Weight",
        "unit_system" => "Unit System",
        _ => field_name,
    }
}
