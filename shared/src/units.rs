//! Unit conversion and normalization module
//!
//! All computation happens in SI units (meters, kilograms). User input in
//! either unit system is converted here, at the boundary, and nowhere else.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{Field, ValidationError};
use crate::validation::{parse_number, parse_optional_inches, validate_positive};

/// Kilograms per pound
pub const KG_PER_LB: f64 = 0.453592;

/// Meters per inch
pub const METERS_PER_INCH: f64 = 0.0254;

// ============================================================================
// Unit System
// ============================================================================

/// Unit system selected by the form toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// The other system
    pub fn toggled(self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }

    pub fn weight_unit(&self) -> WeightUnit {
        match self {
            UnitSystem::Metric => WeightUnit::Kg,
            UnitSystem::Imperial => WeightUnit::Lbs,
        }
    }

    pub fn height_unit(&self) -> HeightUnit {
        match self {
            UnitSystem::Metric => HeightUnit::Cm,
            UnitSystem::Imperial => HeightUnit::FeetInches,
        }
    }

    /// Form label for the height field, e.g. `Height (cm)`
    pub fn height_label(&self) -> String {
        format!("Height ({})", self.height_unit())
    }

    /// Form label for the weight field, e.g. `Weight (lbs)`
    pub fn weight_label(&self) -> String {
        format!("Weight ({})", self.weight_unit())
    }

    /// Placeholder text for the weight field
    pub fn weight_placeholder(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "e.g., 70",
            UnitSystem::Imperial => "e.g., 154",
        }
    }

    /// Placeholder text for the metric height field
    pub fn height_placeholder(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "e.g., 175",
            UnitSystem::Imperial => "Feet",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSystem::Metric => write!(f, "Metric"),
            UnitSystem::Imperial => write!(f, "Imperial"),
        }
    }
}

impl std::str::FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "si" => Ok(UnitSystem::Metric),
            "imperial" | "us" => Ok(UnitSystem::Imperial),
            _ => Err(format!("Unknown unit system: {}", s)),
        }
    }
}

// ============================================================================
// Weight Units
// ============================================================================

/// Weight unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

impl WeightUnit {
    /// Convert from this unit to kilograms
    pub fn to_kg(&self, value: f64) -> f64 {
        match self {
            WeightUnit::Kg => value,
            WeightUnit::Lbs => value * KG_PER_LB,
        }
    }

    /// Get the unit abbreviation
    pub fn abbreviation(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lbs => "lbs",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

// ============================================================================
// Height Units
// ============================================================================

/// Height unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HeightUnit {
    #[default]
    Cm,
    FeetInches, // Entered as two fields, computed as total inches
}

impl HeightUnit {
    /// Convert from this unit to meters
    pub fn to_meters(&self, value: f64) -> f64 {
        match self {
            HeightUnit::Cm => value / 100.0,
            HeightUnit::FeetInches => value * METERS_PER_INCH,
        }
    }

    /// Get the unit abbreviation
    pub fn abbreviation(&self) -> &'static str {
        match self {
            HeightUnit::Cm => "cm",
            HeightUnit::FeetInches => "ft/in",
        }
    }
}

impl fmt::Display for HeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

// ============================================================================
// Measurements
// ============================================================================

/// Raw form field contents, exactly as typed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormInput {
    /// Centimeters (metric only)
    #[serde(default)]
    pub height: String,
    /// Feet (imperial only)
    #[serde(default)]
    pub feet: String,
    /// Inches (imperial only, optional)
    #[serde(default)]
    pub inches: Option<String>,
    /// Kilograms or pounds
    #[serde(default)]
    pub weight: String,
}

impl FormInput {
    pub fn metric(height_cm: impl Into<String>, weight_kg: impl Into<String>) -> Self {
        Self {
            height: height_cm.into(),
            weight: weight_kg.into(),
            ..Self::default()
        }
    }

    pub fn imperial(
        feet: impl Into<String>,
        inches: Option<String>,
        weight_lbs: impl Into<String>,
    ) -> Self {
        Self {
            feet: feet.into(),
            inches,
            weight: weight_lbs.into(),
            ..Self::default()
        }
    }
}

/// A measurement in the units the user entered
///
/// Not yet validated: fields may be NaN when the form field did not parse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub system: UnitSystem,
    /// Centimeters (metric) or feet (imperial)
    pub height_primary: f64,
    /// Inches, imperial only
    #[serde(default)]
    pub height_secondary: f64,
    /// Kilograms (metric) or pounds (imperial)
    pub weight: f64,
}

impl Measurement {
    pub fn metric(height_cm: f64, weight_kg: f64) -> Self {
        Self {
            system: UnitSystem::Metric,
            height_primary: height_cm,
            height_secondary: 0.0,
            weight: weight_kg,
        }
    }

    pub fn imperial(feet: f64, inches: f64, weight_lbs: f64) -> Self {
        Self {
            system: UnitSystem::Imperial,
            height_primary: feet,
            height_secondary: inches,
            weight: weight_lbs,
        }
    }

    /// Build a measurement from raw form fields for the given unit system
    ///
    /// Only the fields relevant to `system` are read.
    pub fn from_form(system: UnitSystem, form: &FormInput) -> Self {
        match system {
            UnitSystem::Metric => Self::metric(parse_number(&form.height), parse_number(&form.weight)),
            UnitSystem::Imperial => Self::imperial(
                parse_number(&form.feet),
                parse_optional_inches(form.inches.as_deref()),
                parse_number(&form.weight),
            ),
        }
    }
}

/// Height and weight in canonical SI units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanonicalMeasurement {
    pub height_meters: f64,
    pub weight_kg: f64,
}

/// Validate a measurement and convert it to SI units
///
/// Height and weight must be finite and strictly positive. An invalid
/// imperial inches value is treated as 0, never as an error.
pub fn convert(measurement: &Measurement) -> Result<CanonicalMeasurement, ValidationError> {
    let height = validate_positive(Field::Height, measurement.height_primary)?;
    let weight = validate_positive(Field::Weight, measurement.weight)?;

    let system = measurement.system;
    let height_meters = match system {
        UnitSystem::Metric => system.height_unit().to_meters(height),
        UnitSystem::Imperial => {
            let inches = if measurement.height_secondary.is_finite() && measurement.height_secondary >= 0.0 {
                measurement.height_secondary
            } else {
                0.0
            };
            system.height_unit().to_meters(height * 12.0 + inches)
        }
    };

    Ok(CanonicalMeasurement {
        height_meters,
        weight_kg: system.weight_unit().to_kg(weight),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::InvalidReason;
    use proptest::prelude::*;
    use rstest::rstest;

    // =========================================================================
    // Conversion Tests
    // =========================================================================

    #[test]
    fn test_metric_conversion() {
        let canonical = convert(&Measurement::metric(175.0, 70.0)).unwrap();
        assert!((canonical.height_meters - 1.75).abs() < 1e-12);
        assert_eq!(canonical.weight_kg, 70.0);
    }

    #[test]
    fn test_imperial_conversion() {
        // 5'7" = 67 inches = 1.7018 m, 154 lbs = 69.853168 kg
        let canonical = convert(&Measurement::imperial(5.0, 7.0, 154.0)).unwrap();
        assert!((canonical.height_meters - 1.7018).abs() < 1e-9);
        assert!((canonical.weight_kg - 69.853168).abs() < 1e-9);
    }

    #[test]
    fn test_imperial_invalid_inches_treated_as_zero() {
        let with_nan = convert(&Measurement::imperial(6.0, f64::NAN, 180.0)).unwrap();
        let with_negative = convert(&Measurement::imperial(6.0, -4.0, 180.0)).unwrap();
        let with_zero = convert(&Measurement::imperial(6.0, 0.0, 180.0)).unwrap();
        assert_eq!(with_nan, with_zero);
        assert_eq!(with_negative, with_zero);
        assert!((with_zero.height_meters - 1.8288).abs() < 1e-9);
    }

    #[rstest]
    #[case(Measurement::metric(0.0, 70.0), Field::Height, InvalidReason::NotPositive)]
    #[case(Measurement::metric(-170.0, 70.0), Field::Height, InvalidReason::NotPositive)]
    #[case(Measurement::metric(170.0, 0.0), Field::Weight, InvalidReason::NotPositive)]
    #[case(Measurement::metric(f64::NAN, 70.0), Field::Height, InvalidReason::NotANumber)]
    #[case(Measurement::metric(170.0, f64::INFINITY), Field::Weight, InvalidReason::NotANumber)]
    #[case(Measurement::imperial(0.0, 11.0, 150.0), Field::Height, InvalidReason::NotPositive)]
    #[case(Measurement::imperial(5.0, 11.0, -1.0), Field::Weight, InvalidReason::NotPositive)]
    fn test_conversion_rejects(
        #[case] measurement: Measurement,
        #[case] field: Field,
        #[case] reason: InvalidReason,
    ) {
        assert_eq!(convert(&measurement), Err(ValidationError::new(field, reason)));
    }

    #[test]
    fn test_from_form_reads_only_active_fields() {
        let form = FormInput {
            height: "175".to_string(),
            feet: "5".to_string(),
            inches: Some("7".to_string()),
            weight: "70".to_string(),
        };
        assert_eq!(
            Measurement::from_form(UnitSystem::Metric, &form),
            Measurement::metric(175.0, 70.0)
        );
        assert_eq!(
            Measurement::from_form(UnitSystem::Imperial, &form),
            Measurement::imperial(5.0, 7.0, 70.0)
        );
    }

    #[test]
    fn test_from_form_empty_fields_fail_validation() {
        let measurement = Measurement::from_form(UnitSystem::Metric, &FormInput::default());
        assert_eq!(
            convert(&measurement),
            Err(ValidationError::new(Field::Height, InvalidReason::NotANumber))
        );

        let imperial = FormInput::imperial("5", None, "");
        let measurement = Measurement::from_form(UnitSystem::Imperial, &imperial);
        assert_eq!(
            convert(&measurement),
            Err(ValidationError::new(Field::Weight, InvalidReason::NotANumber))
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Zero height always fails, whatever the weight
        #[test]
        fn prop_zero_height_always_fails(weight in -1000.0f64..1000.0) {
            prop_assert!(convert(&Measurement::metric(0.0, weight)).is_err());
            prop_assert!(convert(&Measurement::imperial(0.0, 6.0, weight)).is_err());
        }

        /// Valid input always converts to positive SI values
        #[test]
        fn prop_valid_input_is_positive(
            feet in 1.0f64..8.0,
            inches in 0.0f64..12.0,
            lbs in 20.0f64..700.0
        ) {
            let canonical = convert(&Measurement::imperial(feet, inches, lbs)).unwrap();
            prop_assert!(canonical.height_meters > 0.0);
            prop_assert!(canonical.weight_kg > 0.0);
        }
    }

    // =========================================================================
    // Unit Helpers
    // =========================================================================

    #[test]
    fn test_unit_system_labels() {
        assert_eq!(UnitSystem::Metric.height_label(), "Height (cm)");
        assert_eq!(UnitSystem::Metric.weight_label(), "Weight (kg)");
        assert_eq!(UnitSystem::Imperial.height_label(), "Height (ft/in)");
        assert_eq!(UnitSystem::Imperial.weight_label(), "Weight (lbs)");
        assert_eq!(UnitSystem::Imperial.weight_placeholder(), "e.g., 154");
        assert_eq!(UnitSystem::Metric.toggled(), UnitSystem::Imperial);
        assert_eq!(UnitSystem::Imperial.toggled(), UnitSystem::Metric);
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!("Imperial".parse::<UnitSystem>().unwrap(), UnitSystem::Imperial);
        assert_eq!("si".parse::<UnitSystem>().unwrap(), UnitSystem::Metric);
        assert!("cubits".parse::<UnitSystem>().is_err());
    }
}
