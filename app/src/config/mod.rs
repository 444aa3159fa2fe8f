//! Configuration management for the BMI calculator host
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: BMI__)

use bmi_calculator_shared::UnitSystem;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::error::AppError;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub calculator: CalculatorConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Key-value store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file backing the store
    pub path: String,
}

/// Calculation behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculatorConfig {
    /// Delay before a submitted calculation completes
    pub delay_ms: u64,
    /// Unit system selected at startup
    pub unit_system: UnitSystem,
}

impl CalculatorConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Rendering preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Stand-in for the system dark-mode preference when no theme is stored
    pub prefers_dark: bool,
    /// Entries shown in the recent calculations list
    pub recent_entries: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            prefers_dark: false,
            recent_entries: bmi_calculator_shared::history::RECENT_ENTRIES,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                path: "bmi-store.json".to_string(),
            },
            calculator: CalculatorConfig {
                delay_ms: 1000,
                unit_system: UnitSystem::Metric,
            },
            display: DisplayConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with BMI__ prefix
    pub fn load() -> Result<Self, AppError> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Load from environment-specific config file
            .add_source(config::File::with_name(&config_file).required(false))
            // Override with environment variables (BMI__ prefix)
            // e.g., BMI__CALCULATOR__DELAY_MS=0 disables the delay
            .add_source(config::Environment::with_prefix("BMI").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.storage.path, "bmi-store.json");
        assert_eq!(config.calculator.delay(), Duration::from_secs(1));
        assert_eq!(config.calculator.unit_system, UnitSystem::Metric);
        assert_eq!(config.display.recent_entries, 5);
        assert!(!config.display.prefers_dark);
    }

    #[test]
    fn test_defaults_survive_config_layering() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default()).unwrap())
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.calculator.delay_ms, 1000);
        assert_eq!(config.calculator.unit_system, UnitSystem::Metric);
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let toml = r#"
            [calculator]
            delay_ms = 0
            unit_system = "imperial"

            [display]
            prefers_dark = true
        "#;
        let config: AppConfig = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default()).unwrap())
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.calculator.delay_ms, 0);
        assert_eq!(config.calculator.unit_system, UnitSystem::Imperial);
        assert!(config.display.prefers_dark);
        assert_eq!(config.display.recent_entries, 5);
        assert_eq!(config.storage.path, "bmi-store.json");
    }

    #[test]
    fn test_is_production() {
        // Default should be false (development)
        assert!(!AppConfig::is_production());
    }
}
