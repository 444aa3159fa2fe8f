//! BMI Calculator
//!
//! Interactive terminal host for the BMI widget.
//!
//! ## Architecture
//!
//! - Commands: stdin lines parsed into widget actions
//! - Services: the session driving the shared controller
//! - Presenter: a task rendering every published snapshot and notification
//! - Storage: a JSON file standing in for browser local storage

use anyhow::Result;
use bmi_calculator_app::commands;
use bmi_calculator_app::services::SessionService;
use bmi_calculator_app::state::{AppState, Store, Subscriptions};
use bmi_calculator_app::storage::FileStore;
use bmi_calculator_app::{config, presenter};
use bmi_calculator_shared::Calculator;
use tokio::io::BufReader;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    // Load configuration
    let config = config::AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if config::AppConfig::is_production() { "production" } else { "development" },
        "Starting BMI Calculator"
    );

    if config::AppConfig::is_production() {
        validate_production_config(&config)?;
    }

    // Open the store and hydrate the widget from it
    let store = FileStore::open(&config.storage.path)?;
    info!(path = %store.path().display(), "Store opened");

    let calculator = Calculator::hydrate(Box::new(store) as Store, config.display.prefers_dark)
        .with_unit_system(config.calculator.unit_system);

    let recent_entries = config.display.recent_entries;
    let (state, subscriptions) = AppState::new(calculator, config);
    let presenter = spawn_presenter(subscriptions, recent_entries);

    let mut session = SessionService::new(state);
    println!("{}", presenter::render_help(session.snapshot().unit_system));

    let interrupted = tokio::select! {
        result = commands::run(&mut session, BufReader::new(tokio::io::stdin())) => {
            result?;
            false
        }
        _ = shutdown_signal() => true,
    };

    if interrupted && session.snapshot().calculating {
        if let Err(e) = session.cancel().await {
            warn!(error = %e, "Failed to cancel pending calculation");
        }
    }

    // Dropping the session closes the notification channel and ends the presenter
    drop(session);
    if let Err(e) = presenter.await {
        error!(error = %e, "Presenter task failed");
    }

    info!("Shutdown complete");
    Ok(())
}

/// Render snapshots and notifications as they are published
fn spawn_presenter(subscriptions: Subscriptions, recent_entries: usize) -> JoinHandle<()> {
    let Subscriptions {
        mut snapshots,
        mut notifications,
    } = subscriptions;

    tokio::spawn(async move {
        println!("{}", presenter::render_snapshot(&snapshots.borrow_and_update(), recent_entries));

        loop {
            // Notifications first so the last ones are drained before exit
            tokio::select! {
                biased;
                notification = notifications.recv() => match notification {
                    Some(notification) => println!("{}", presenter::render_notification(&notification)),
                    None => break,
                },
                changed = snapshots.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = snapshots.borrow_and_update().clone();
                    println!("{}", presenter::render_snapshot(&snapshot, recent_entries));
                }
            }
        }
    })
}

/// Initialize tracing/logging
///
/// Logs go to stderr so they never interleave with the rendered widget.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "bmi_calculator_app=info,bmi_calculator_shared=info".into()
        } else {
            "bmi_calculator_app=debug,bmi_calculator_shared=debug".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        // Pretty logging for development
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}

/// Validate configuration for production deployment
fn validate_production_config(config: &config::AppConfig) -> Result<()> {
    let mut errors = Vec::new();

    if config.storage.path.trim().is_empty() {
        errors.push("Storage path must not be empty");
    }

    if config.display.recent_entries == 0 {
        warn!("Recent entries is 0 - the recent calculations list will be empty");
    }

    if !errors.is_empty() {
        for err in &errors {
            error!("Configuration error: {}", err);
        }
        anyhow::bail!("Invalid production configuration");
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
