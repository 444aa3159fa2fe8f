//! Light/dark theme preference

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::StorageError;
use crate::storage::{KeyValueStore, THEME_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Literal persisted under the theme key
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }

    /// Initial theme
    ///
    /// A stored `"dark"` is dark and any other non-empty stored value is
    /// light. With nothing stored the system preference decides.
    pub fn resolve(stored: Option<&str>, prefers_dark: bool) -> Self {
        match stored {
            Some("dark") => Theme::Dark,
            Some(raw) if !raw.is_empty() => Theme::Light,
            _ if prefers_dark => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn load(store: &dyn KeyValueStore, prefers_dark: bool) -> Result<Self, StorageError> {
        let stored = store.get(THEME_KEY)?;
        Ok(Self::resolve(stored.as_deref(), prefers_dark))
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        store.set(THEME_KEY, self.as_str())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
