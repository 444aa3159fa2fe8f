//! Widget controller
//!
//! Owns every piece of mutable widget state: unit system, theme, latest
//! result, history log and the pending-calculation flag. Hosts drive it with
//! discrete user actions and render from [`Calculator::snapshot`].
//!
//! # Lifecycle
//!
//! 1. [`Calculator::hydrate`] reads history and theme once at startup.
//! 2. Each action replaces the affected state wholesale and persists it.
//! 3. Persistence failures are logged; in-memory state is kept.
//!
//! # Re-entrancy
//!
//! A submission marks the calculator as pending until it completes or is
//! cancelled. A second submission while pending is rejected with
//! [`CalculatorError::Busy`], mirroring a disabled submit button.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::bmi::{compute_canonical, BmiResult, Gauge};
use crate::errors::CalculatorError;
use crate::history::{HistoryEntry, HistoryLog};
use crate::storage::KeyValueStore;
use crate::theme::Theme;
use crate::types::{Notification, WidgetSnapshot};
use crate::units::{convert, FormInput, Measurement, UnitSystem};

pub struct Calculator<S: KeyValueStore> {
    store: S,
    unit_system: UnitSystem,
    theme: Theme,
    history: HistoryLog,
    result: Option<BmiResult>,
    pending: bool,
}

impl<S: KeyValueStore> Calculator<S> {
    /// Build the calculator from persisted state
    ///
    /// Malformed stored history is replaced by an empty log.
    pub fn hydrate(store: S, prefers_dark: bool) -> Self {
        let history = HistoryLog::load(&store).unwrap_or_else(|e| {
            warn!(error = %e, "Discarding unreadable stored history");
            HistoryLog::default()
        });
        let theme = Theme::load(&store, prefers_dark).unwrap_or_else(|e| {
            warn!(error = %e, "Could not read stored theme");
            Theme::resolve(None, prefers_dark)
        });

        info!(entries = history.len(), theme = %theme, "Calculator hydrated");

        Self {
            store,
            unit_system: UnitSystem::default(),
            theme,
            history,
            result: None,
            pending: false,
        }
    }

    /// Start in the given unit system instead of metric
    pub fn with_unit_system(mut self, unit_system: UnitSystem) -> Self {
        self.unit_system = unit_system;
        self
    }

    // ========================================================================
    // Calculation
    // ========================================================================

    /// Capture the form for the current unit system
    pub fn measurement_for(&self, form: &FormInput) -> Measurement {
        Measurement::from_form(self.unit_system, form)
    }

    /// Mark a calculation as pending
    pub fn begin_calculation(&mut self) -> Result<(), CalculatorError> {
        if self.pending {
            return Err(CalculatorError::Busy);
        }
        self.pending = true;
        debug!("Calculation pending");
        Ok(())
    }

    /// Drop the pending calculation without computing anything
    pub fn cancel_calculation(&mut self) -> Result<(), CalculatorError> {
        if !self.pending {
            return Err(CalculatorError::NotPending);
        }
        self.pending = false;
        debug!("Pending calculation cancelled");
        Ok(())
    }

    /// Finish the pending calculation
    ///
    /// Invalid input, or a measurement whose BMI overflows to infinity,
    /// yields [`Notification::InvalidInput`] and leaves result and history
    /// untouched. Fails only when nothing is pending, e.g. after
    /// a cancel raced the deferred completion.
    pub fn complete_calculation(
        &mut self,
        measurement: &Measurement,
        now: DateTime<Utc>,
    ) -> Result<Notification, CalculatorError> {
        if !self.pending {
            return Err(CalculatorError::NotPending);
        }
        self.pending = false;

        let canonical = match convert(measurement) {
            Ok(canonical) => canonical,
            Err(e) => {
                info!(error = %e, system = %measurement.system, "Rejected measurement");
                return Ok(Notification::invalid_input());
            }
        };

        let result = compute_canonical(&canonical, now);
        if !result.value.is_finite() {
            info!(bmi = result.value, system = %measurement.system, "Rejected measurement with unbounded BMI");
            return Ok(Notification::invalid_input());
        }

        let notification = Notification::CalculationSucceeded {
            value: result.value,
            category: result.category,
        };

        self.history = self.history.append(HistoryEntry::new(result.value, now));
        self.persist_history();

        info!(bmi = result.value, category = %result.category, "BMI calculated");
        self.result = Some(result);

        Ok(notification)
    }

    /// Begin and complete in one step, for hosts without a delay
    pub fn calculate(&mut self, form: &FormInput, now: DateTime<Utc>) -> Result<Notification, CalculatorError> {
        let measurement = self.measurement_for(form);
        self.begin_calculation()?;
        self.complete_calculation(&measurement, now)
    }

    // ========================================================================
    // Other actions
    // ========================================================================

    pub fn clear_history(&mut self) -> Notification {
        self.history = self.history.clear();
        self.persist_history();
        info!("History cleared");
        Notification::HistoryCleared
    }

    pub fn set_unit_system(&mut self, unit_system: UnitSystem) {
        self.unit_system = unit_system;
    }

    pub fn toggle_unit_system(&mut self) -> UnitSystem {
        self.unit_system = self.unit_system.toggled();
        self.unit_system
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        if let Err(e) = self.theme.save(&mut self.store) {
            warn!(error = %e, "Failed to persist theme");
        }
        self.theme
    }

    fn persist_history(&mut self) {
        if let Err(e) = self.history.save(&mut self.store) {
            warn!(error = %e, "Failed to persist history");
        }
    }

    // ========================================================================
    // Read side
    // ========================================================================

    pub fn snapshot(&self) -> WidgetSnapshot {
        WidgetSnapshot {
            unit_system: self.unit_system,
            theme: self.theme,
            calculating: self.pending,
            result: self.result.clone(),
            gauge: self.result.as_ref().map(|r| Gauge::new(r.value)),
            history: self.history.entries().to_vec(),
            trend: self.history.trend(),
        }
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn result(&self) -> Option<&BmiResult> {
        self.result.as_ref()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn unit_system(&self) -> UnitSystem {
        self.unit_system
    }

    pub fn is_calculating(&self) -> bool {
        self.pending
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
