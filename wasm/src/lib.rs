//! BMI Calculator WASM Module
//!
//! Browser bindings for the widget core. The page owns the markup, the
//! charts and the submit delay; this crate owns every rule, persisting
//! through `window.localStorage`.
//!
//! Structured values cross the boundary as JSON strings.

use bmi_calculator_shared::faq::{FaqEntry, DISCLAIMER, FAQ};
use bmi_calculator_shared::{
    self as shared, Calculator, FormInput, KeyValueStore, Measurement, MemoryStore, StorageError, UnitSystem,
};
use chrono::Utc;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = localStorage, js_name = getItem)]
    fn local_storage_get(key: &str) -> Result<Option<String>, JsValue>;

    #[wasm_bindgen(catch, js_namespace = localStorage, js_name = setItem)]
    fn local_storage_set(key: &str, value: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = localStorage, js_name = removeItem)]
    fn local_storage_remove(key: &str) -> Result<(), JsValue>;
}

/// `window.localStorage` as a key-value store
///
/// Quota errors and disabled storage surface as backend errors.
struct LocalStorage;

fn backend_error(e: JsValue) -> StorageError {
    StorageError::Backend(format!("{:?}", e))
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        local_storage_get(key).map_err(backend_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        local_storage_set(key, value).map_err(backend_error)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        local_storage_remove(key).map_err(backend_error)
    }
}

/// The widget as seen from JavaScript
///
/// `submit` captures the form and marks the calculation pending; the page
/// calls `complete` when its delay elapses, or `cancel` to drop it.
#[wasm_bindgen]
pub struct BmiWidget {
    calculator: Calculator<Box<dyn KeyValueStore>>,
    submitted: Option<Measurement>,
}

#[wasm_bindgen]
impl BmiWidget {
    /// Hydrate from `localStorage`
    #[wasm_bindgen(constructor)]
    pub fn new(prefers_dark: bool) -> BmiWidget {
        Self::with_store(Box::new(LocalStorage), prefers_dark)
    }

    /// A widget that forgets everything on reload
    #[wasm_bindgen(js_name = inMemory)]
    pub fn in_memory(prefers_dark: bool) -> BmiWidget {
        Self::with_store(Box::new(MemoryStore::new()), prefers_dark)
    }

    /// Capture the form; `false` while another calculation is pending
    pub fn submit(&mut self, height: String, feet: String, inches: Option<String>, weight: String) -> bool {
        let form = FormInput {
            height,
            feet,
            inches,
            weight,
        };
        let measurement = self.calculator.measurement_for(&form);
        if self.calculator.begin_calculation().is_err() {
            return false;
        }
        self.submitted = Some(measurement);
        true
    }

    /// Finish the pending calculation
    ///
    /// Returns the notification as JSON, or `undefined` when nothing is
    /// pending because the calculation was cancelled.
    pub fn complete(&mut self) -> Result<Option<String>, JsError> {
        let Some(measurement) = self.submitted.take() else {
            return Ok(None);
        };
        match self.calculator.complete_calculation(&measurement, Utc::now()) {
            Ok(notification) => Ok(Some(serde_json::to_string(&notification)?)),
            Err(_) => Ok(None),
        }
    }

    /// Drop the pending calculation; `false` if there was none
    pub fn cancel(&mut self) -> bool {
        self.submitted = None;
        self.calculator.cancel_calculation().is_ok()
    }

    #[wasm_bindgen(js_name = isCalculating)]
    pub fn is_calculating(&self) -> bool {
        self.calculator.is_calculating()
    }

    /// Clear history; returns the notification as JSON
    #[wasm_bindgen(js_name = clearHistory)]
    pub fn clear_history(&mut self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.calculator.clear_history())?)
    }

    /// Switch unit systems; returns the new one
    #[wasm_bindgen(js_name = toggleUnits)]
    pub fn toggle_units(&mut self) -> String {
        self.calculator.toggle_unit_system().to_string()
    }

    #[wasm_bindgen(js_name = setUnits)]
    pub fn set_units(&mut self, unit_system: &str) -> Result<(), JsError> {
        let unit_system: UnitSystem = unit_system.parse().map_err(|e: String| JsError::new(&e))?;
        self.calculator.set_unit_system(unit_system);
        Ok(())
    }

    /// Flip the theme; returns `"dark"` or `"light"`
    #[wasm_bindgen(js_name = toggleTheme)]
    pub fn toggle_theme(&mut self) -> String {
        self.calculator.toggle_theme().as_str().to_string()
    }

    /// Everything the page renders from, as JSON
    pub fn snapshot(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.calculator.snapshot())?)
    }
}

impl BmiWidget {
    fn with_store(store: Box<dyn KeyValueStore>, prefers_dark: bool) -> BmiWidget {
        BmiWidget {
            calculator: Calculator::hydrate(store, prefers_dark),
            submitted: None,
        }
    }
}

/// Calculate BMI from weight (kg) and height (cm), rounded to one decimal
///
/// Returns 0 for non-positive or non-numeric input, or when the result
/// overflows.
#[wasm_bindgen]
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    match shared::convert(&Measurement::metric(height_cm, weight_kg)) {
        Ok(canonical) => {
            let bmi = shared::round1(shared::calculate_bmi(canonical.height_meters, canonical.weight_kg));
            if bmi.is_finite() {
                bmi
            } else {
                0.0
            }
        }
        Err(_) => 0.0,
    }
}

/// Category label for a BMI value
#[wasm_bindgen]
pub fn classify_bmi(bmi: f64) -> String {
    shared::classify_bmi(bmi).label().to_string()
}

/// Needle angle in degrees for the gauge
#[wasm_bindgen]
pub fn gauge_angle(bmi: f64) -> f64 {
    shared::gauge_angle(bmi)
}

/// The four tips for the category of `bmi`, as a JSON array
#[wasm_bindgen]
pub fn health_tips(bmi: f64) -> Result<String, JsError> {
    Ok(serde_json::to_string(shared::tips_for(shared::classify_bmi(bmi)))?)
}

/// Reference chart bars, with the marker line when `current_bmi` is given
#[wasm_bindgen]
pub fn reference_chart(current_bmi: Option<f64>) -> Result<String, JsError> {
    Ok(serde_json::to_string(&shared::reference_chart(current_bmi))?)
}

#[derive(Serialize)]
struct FaqPayload<'a> {
    entries: &'a [FaqEntry],
    disclaimer: &'a str,
}

/// FAQ entries and the disclaimer, as JSON
#[wasm_bindgen]
pub fn faq() -> Result<String, JsError> {
    Ok(serde_json::to_string(&FaqPayload {
        entries: &FAQ,
        disclaimer: DISCLAIMER,
    })?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi() {
        assert_eq!(calculate_bmi(70.0, 175.0), 22.9);
        assert_eq!(calculate_bmi(70.0, 0.0), 0.0);
        assert_eq!(calculate_bmi(f64::NAN, 175.0), 0.0);
        assert_eq!(calculate_bmi(70.0, 1e-158), 0.0);
    }

    #[test]
    fn test_classify_and_gauge() {
        assert_eq!(classify_bmi(18.5), "Normal");
        assert_eq!(classify_bmi(30.0), "Obese");
        assert_eq!(gauge_angle(25.0), 90.0);
    }

    #[test]
    fn test_tips_json() {
        let tips: Vec<String> = serde_json::from_str(&health_tips(17.0).unwrap()).unwrap();
        assert_eq!(tips.len(), 4);
    }

    #[test]
    fn test_widget_lifecycle() {
        let mut widget = BmiWidget::in_memory(false);

        assert!(widget.submit("175".into(), String::new(), None, "70".into()));
        assert!(!widget.submit("160".into(), String::new(), None, "60".into()));
        assert!(widget.is_calculating());

        let notification = widget.complete().unwrap().unwrap();
        assert!(notification.contains("calculation_succeeded"));
        assert!(widget.complete().unwrap().is_none());

        let snapshot: serde_json::Value = serde_json::from_str(&widget.snapshot().unwrap()).unwrap();
        assert_eq!(snapshot["result"]["value"], 22.9);
        assert_eq!(snapshot["history"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_cancelled_widget_completes_nothing() {
        let mut widget = BmiWidget::in_memory(true);
        assert!(!widget.cancel());

        widget.set_units("imperial").unwrap();
        assert!(widget.submit(String::new(), "5".into(), Some("7".into()), "154".into()));
        assert!(widget.cancel());
        assert!(widget.complete().unwrap().is_none());
        assert_eq!(widget.toggle_theme(), "light");
    }

    #[test]
    fn test_faq_payload() {
        let payload: serde_json::Value = serde_json::from_str(&faq().unwrap()).unwrap();
        assert_eq!(payload["entries"].as_array().unwrap().len(), 6);
        assert_eq!(payload["disclaimer"], DISCLAIMER);
    }
}
