//! Application state management
//!
//! The single process-wide widget state plus the channels presenters listen
//! on. All fields are cheap to clone so the deferred calculation task can
//! carry its own handle.

use bmi_calculator_shared::{Calculator, KeyValueStore, Notification, WidgetSnapshot};
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};
use tracing::debug;

use crate::config::AppConfig;

/// Store type the host runs on
pub type Store = Box<dyn KeyValueStore + Send>;

/// Controller type the host runs on
pub type HostCalculator = Calculator<Store>;

/// Receiving ends handed to the presenter
pub struct Subscriptions {
    pub snapshots: watch::Receiver<Arc<WidgetSnapshot>>,
    pub notifications: mpsc::UnboundedReceiver<Notification>,
}

/// Shared application state
///
/// # Concurrency
///
/// The calculator sits behind one async mutex. Every action takes the lock,
/// mutates, publishes a fresh snapshot and releases it, so presenters only
/// ever see whole states.
#[derive(Clone)]
pub struct AppState {
    /// Widget controller
    pub calculator: Arc<Mutex<HostCalculator>>,
    /// Application configuration
    pub config: Arc<AppConfig>,
    snapshots: Arc<watch::Sender<Arc<WidgetSnapshot>>>,
    notifications: mpsc::UnboundedSender<Notification>,
}

impl AppState {
    /// Create the state and the presenter's subscriptions
    pub fn new(calculator: HostCalculator, config: AppConfig) -> (Self, Subscriptions) {
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(calculator.snapshot()));
        let (notification_tx, notification_rx) = mpsc::unbounded_channel();

        let state = Self {
            calculator: Arc::new(Mutex::new(calculator)),
            config: Arc::new(config),
            snapshots: Arc::new(snapshot_tx),
            notifications: notification_tx,
        };
        let subscriptions = Subscriptions {
            snapshots: snapshot_rx,
            notifications: notification_rx,
        };

        (state, subscriptions)
    }

    /// Replace the published snapshot with the calculator's current state
    pub fn publish(&self, calculator: &HostCalculator) {
        self.snapshots.send_replace(Arc::new(calculator.snapshot()));
    }

    /// Forward a notification; dropped silently once the presenter is gone
    pub fn notify(&self, notification: Notification) {
        if self.notifications.send(notification).is_err() {
            debug!("Notification dropped, presenter has shut down");
        }
    }

    /// Latest published snapshot
    pub fn current(&self) -> Arc<WidgetSnapshot> {
        self.snapshots.borrow().clone()
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
