//! Widget session service
//!
//! Turns user actions into controller calls. Submissions complete after the
//! configured delay on a spawned task; the task handle is kept so a pending
//! calculation can be cancelled.

use bmi_calculator_shared::{CalculatorError, FormInput, Measurement, Theme, UnitSystem, WidgetSnapshot};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::AppResult;
use crate::state::AppState;

pub struct SessionService {
    state: AppState,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl SessionService {
    pub fn new(state: AppState) -> Self {
        let delay = state.config().calculator.delay();
        Self {
            state,
            delay,
            pending: None,
        }
    }

    /// Submit the form for a deferred calculation
    ///
    /// The form is captured in the unit system active at submission time,
    /// after switching to `unit_system` when one is given. Rejected with
    /// [`CalculatorError::Busy`] while another submission is pending; a
    /// rejected submission changes nothing.
    pub async fn submit(&mut self, unit_system: Option<UnitSystem>, form: FormInput) -> AppResult<()> {
        let measurement = {
            let mut calc = self.state.calculator.lock().await;
            calc.begin_calculation()?;
            if let Some(unit_system) = unit_system {
                calc.set_unit_system(unit_system);
            }
            let measurement = calc.measurement_for(&form);
            self.state.publish(&calc);
            measurement
        };

        debug!(delay_ms = self.delay.as_millis() as u64, "Scheduling calculation");
        let state = self.state.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            complete(&state, &measurement).await;
        }));

        Ok(())
    }

    /// Abort the pending calculation
    pub async fn cancel(&mut self) -> AppResult<()> {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }

        let mut calc = self.state.calculator.lock().await;
        calc.cancel_calculation()?;
        self.state.publish(&calc);
        info!("Calculation cancelled");
        Ok(())
    }

    /// Wait for the pending calculation, if any, to finish
    pub async fn wait_idle(&mut self) {
        if let Some(handle) = self.pending.take() {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    debug!(error = %e, "Calculation task failed");
                }
            }
        }
    }

    pub async fn clear_history(&self) {
        let mut calc = self.state.calculator.lock().await;
        let notification = calc.clear_history();
        self.state.publish(&calc);
        self.state.notify(notification);
    }

    pub async fn set_unit_system(&self, unit_system: UnitSystem) {
        let mut calc = self.state.calculator.lock().await;
        calc.set_unit_system(unit_system);
        self.state.publish(&calc);
    }

    pub async fn toggle_unit_system(&self) -> UnitSystem {
        let mut calc = self.state.calculator.lock().await;
        let unit_system = calc.toggle_unit_system();
        self.state.publish(&calc);
        unit_system
    }

    pub async fn toggle_theme(&self) -> Theme {
        let mut calc = self.state.calculator.lock().await;
        let theme = calc.toggle_theme();
        self.state.publish(&calc);
        theme
    }

    pub fn snapshot(&self) -> Arc<WidgetSnapshot> {
        self.state.current()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Body of the deferred task
async fn complete(state: &AppState, measurement: &Measurement) {
    let mut calc = state.calculator.lock().await;
    match calc.complete_calculation(measurement, Utc::now()) {
        Ok(notification) => {
            state.publish(&calc);
            drop(calc);
            state.notify(notification);
        }
        Err(CalculatorError::NotPending) => debug!("Calculation was cancelled before completing"),
        Err(e) => debug!(error = %e, "Calculation not completed"),
    }
}
