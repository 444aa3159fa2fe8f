//! BMI computation module
//!
//! Computes BMI from canonical SI measurements, classifies it, and maps it
//! onto the semicircular gauge.
//!
//! The rounded one-decimal value is canonical: classification, the gauge and
//! the history log all operate on it, never on the raw quotient.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tips::tips_for;
use crate::units::CanonicalMeasurement;

// ============================================================================
// Categories
// ============================================================================

/// Upper bound (exclusive) of the underweight band
pub const UNDERWEIGHT_BELOW: f64 = 18.5;
/// Upper bound (exclusive) of the normal band
pub const NORMAL_BELOW: f64 = 25.0;
/// Upper bound (exclusive) of the overweight band
pub const OVERWEIGHT_BELOW: f64 = 30.0;

/// BMI category classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl Category {
    /// All categories in ascending order
    pub const ALL: [Category; 4] = [
        Category::Underweight,
        Category::Normal,
        Category::Overweight,
        Category::Obese,
    ];

    /// Position in the ascending order, 0 for underweight
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Category::Underweight => "Underweight",
            Category::Normal => "Normal",
            Category::Overweight => "Overweight",
            Category::Obese => "Obese",
        }
    }

    /// Reference range label as shown on the category chart
    pub fn range_label(&self) -> &'static str {
        match self {
            Category::Underweight => "BMI < 18.5",
            Category::Normal => "BMI 18.5-24.9",
            Category::Overweight => "BMI 25-29.9",
            Category::Obese => "BMI ≥ 30",
        }
    }

    /// Accent color used for the category text and chart bar
    pub fn accent(&self) -> &'static str {
        match self {
            Category::Underweight => "blue",
            Category::Normal => "green",
            Category::Overweight => "yellow",
            Category::Obese => "red",
        }
    }

    /// Height of the category bar on the reference chart
    pub fn reference_height(&self) -> f64 {
        match self {
            Category::Underweight => 18.5,
            Category::Normal => 24.9,
            Category::Overweight => 29.9,
            Category::Obese => 40.0,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Classify a BMI value
///
/// Lower bounds are inclusive: 18.5 is normal, 25.0 overweight, 30.0 obese.
pub fn classify_bmi(bmi: f64) -> Category {
    if bmi < UNDERWEIGHT_BELOW {
        Category::Underweight
    } else if bmi < NORMAL_BELOW {
        Category::Normal
    } else if bmi < OVERWEIGHT_BELOW {
        Category::Overweight
    } else {
        Category::Obese
    }
}

// ============================================================================
// BMI Calculation
// ============================================================================

/// Round to one decimal place, half away from zero
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Unrounded BMI: weight(kg) / height(m)²
pub fn calculate_bmi(height_meters: f64, weight_kg: f64) -> f64 {
    weight_kg / (height_meters * height_meters)
}

/// BMI calculation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BmiResult {
    /// BMI rounded to one decimal place
    pub value: f64,
    pub category: Category,
    pub tips: Vec<String>,
    pub computed_at: DateTime<Utc>,
}

/// Compute a BMI result from validated SI values
///
/// The caller guarantees positive finite inputs.
pub fn compute(height_meters: f64, weight_kg: f64) -> BmiResult {
    compute_at(height_meters, weight_kg, Utc::now())
}

/// Compute a BMI result stamped with the given time
pub fn compute_at(height_meters: f64, weight_kg: f64, computed_at: DateTime<Utc>) -> BmiResult {
    let value = round1(calculate_bmi(height_meters, weight_kg));
    let category = classify_bmi(value);

    BmiResult {
        value,
        category,
        tips: tips_for(category).iter().map(|tip| tip.to_string()).collect(),
        computed_at,
    }
}

/// Compute a BMI result from a converted measurement
pub fn compute_canonical(measurement: &CanonicalMeasurement, computed_at: DateTime<Utc>) -> BmiResult {
    compute_at(measurement.height_meters, measurement.weight_kg, computed_at)
}

// ============================================================================
// Gauge
// ============================================================================

/// Lowest BMI shown on the gauge
pub const GAUGE_FLOOR: f64 = 15.0;
/// BMI at which the needle saturates
pub const GAUGE_CEILING: f64 = 40.0;

/// Gauge segments as (bmi_start, bmi_end, angle_start, angle_end)
const GAUGE_SEGMENTS: [(f64, f64, f64, f64); 4] = [
    (GAUGE_FLOOR, UNDERWEIGHT_BELOW, 0.0, 36.0),
    (UNDERWEIGHT_BELOW, NORMAL_BELOW, 36.0, 90.0),
    (NORMAL_BELOW, OVERWEIGHT_BELOW, 90.0, 144.0),
    (OVERWEIGHT_BELOW, GAUGE_CEILING, 144.0, 180.0),
];

/// Labels printed under the gauge scale
pub const GAUGE_SCALE_LABELS: [&str; 5] = ["15", "18.5", "25", "30", "35+"];

/// BMI value each scale label marks
pub const GAUGE_SCALE_POINTS: [f64; 5] = [15.0, 18.5, 25.0, 30.0, 35.0];

/// Needle angle in degrees on the 0-180° semicircle
///
/// Piecewise linear across the category bands. Values outside [15, 40] are
/// clamped, so the result is always within [0, 180].
pub fn gauge_angle(bmi: f64) -> f64 {
    if bmi.is_nan() {
        return 0.0;
    }
    let bmi = bmi.clamp(GAUGE_FLOOR, GAUGE_CEILING);

    for (bmi_start, bmi_end, angle_start, angle_end) in GAUGE_SEGMENTS {
        if bmi <= bmi_end {
            let fraction = ((bmi - bmi_start) / (bmi_end - bmi_start)).min(1.0);
            return angle_start + fraction * (angle_end - angle_start);
        }
    }
    180.0
}

/// Gauge payload for the visualization collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gauge {
    pub value: f64,
    pub angle: f64,
    pub category: Category,
    pub scale_labels: Vec<String>,
}

impl Gauge {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            angle: gauge_angle(value),
            category: classify_bmi(value),
            scale_labels: GAUGE_SCALE_LABELS.iter().map(|l| l.to_string()).collect(),
        }
    }
}

// ============================================================================
// Reference Chart
// ============================================================================

/// Top of the reference chart's value axis
pub const REFERENCE_CHART_MAX: f64 = 45.0;

/// One category bar on the reference chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceBand {
    pub category: Category,
    pub label: String,
    pub range_label: String,
    pub height: f64,
    pub accent: String,
}

/// Reference chart payload: category bars plus an optional marker line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceChart {
    pub bands: Vec<ReferenceBand>,
    pub y_max: f64,
    /// Marker line, present only when the current BMI lies on the axis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_bmi: Option<f64>,
}

/// Build the reference chart for an optional current BMI
pub fn reference_chart(current_bmi: Option<f64>) -> ReferenceChart {
    let bands = Category::ALL
        .iter()
        .map(|category| ReferenceBand {
            category: *category,
            label: category.label().to_string(),
            range_label: category.range_label().to_string(),
            height: category.reference_height(),
            accent: category.accent().to_string(),
        })
        .collect();

    ReferenceChart {
        bands,
        y_max: REFERENCE_CHART_MAX,
        current_bmi: current_bmi.filter(|bmi| (0.0..=REFERENCE_CHART_MAX).contains(bmi)),
    }
}
