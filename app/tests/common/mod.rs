//! Common test utilities for integration tests
//!
//! Builds a session over an in-memory store so the whole host flow runs
//! without touching the filesystem.

use bmi_calculator_app::commands::{self, Command, Reply};
use bmi_calculator_app::config::AppConfig;
use bmi_calculator_app::error::AppResult;
use bmi_calculator_app::services::SessionService;
use bmi_calculator_app::state::{AppState, Store, Subscriptions};
use bmi_calculator_shared::{Calculator, KeyValueStore, MemoryStore, Notification};

/// Test application wrapper
pub struct TestApp {
    pub session: SessionService,
    pub subscriptions: Subscriptions,
}

impl TestApp {
    /// Fresh widget with an empty store
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }

    /// Widget hydrated from a pre-populated store
    pub fn with_store(store: MemoryStore) -> Self {
        let config = test_config();
        let calculator = Calculator::hydrate(Box::new(store) as Store, config.display.prefers_dark);
        let (state, subscriptions) = AppState::new(calculator, config);

        Self {
            session: SessionService::new(state),
            subscriptions,
        }
    }

    /// Parse and run one command line
    pub async fn run(&mut self, line: &str) -> AppResult<Reply> {
        let command: Command = line.parse()?;
        commands::execute(&mut self.session, command).await
    }

    /// Notifications raised so far
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        let mut out = Vec::new();
        while let Ok(notification) = self.subscriptions.notifications.try_recv() {
            out.push(notification);
        }
        out
    }

    /// Read a raw value from the backing store
    pub async fn stored(&self, key: &str) -> Option<String> {
        let calc = self.session.state().calculator.lock().await;
        calc.store().get(key).ok().flatten()
    }
}

/// Configuration matching the defaults with a one-second delay
pub fn test_config() -> AppConfig {
    AppConfig::default()
}
