//! BMI history log
//!
//! A capped, most-recent-first log of past results. Entries are immutable;
//! the only mutations are prepending a new entry and clearing the whole log.
//! Every mutation produces a complete new entry list, so a reader holding a
//! snapshot never sees a partially applied change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::errors::StorageError;
use crate::storage::{KeyValueStore, HISTORY_KEY};

/// Maximum number of retained entries
pub const HISTORY_CAPACITY: usize = 10;

/// Entries shown in the "Recent Calculations" list
pub const RECENT_ENTRIES: usize = 5;

/// Padding added above and below the trend chart's value range
const CHART_PADDING: f64 = 2.0;

/// One persisted BMI reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub value: f64,
    #[serde(rename = "date", alias = "recordedAt")]
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(value: f64, recorded_at: DateTime<Utc>) -> Self {
        Self { value, recorded_at }
    }
}

/// Direction of change between the newest and oldest retained entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl Trend {
    /// Arrow-prefixed label for the statistics panel
    pub fn label(&self) -> &'static str {
        match self {
            Trend::Increasing => "↑ Increasing",
            Trend::Decreasing => "↓ Decreasing",
            Trend::Stable => "→ Stable",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Most-recent-first log of at most [`HISTORY_CAPACITY`] entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log from entries already in most-recent-first order
    ///
    /// Anything beyond the capacity is dropped from the old end.
    pub fn from_entries(mut entries: Vec<HistoryEntry>) -> Self {
        entries.truncate(HISTORY_CAPACITY);
        Self { entries }
    }

    /// Prepend an entry, evicting the oldest beyond capacity
    pub fn append(&self, entry: HistoryEntry) -> Self {
        let mut entries = Vec::with_capacity(HISTORY_CAPACITY + 1);
        entries.push(entry);
        entries.extend(self.entries.iter().cloned());
        Self::from_entries(entries)
    }

    /// An empty log
    pub fn clear(&self) -> Self {
        Self::default()
    }

    /// Entries, most recent first
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    pub fn oldest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Compare the newest entry against the oldest retained one
    ///
    /// A newest value above the oldest reads as decreasing, below as
    /// increasing.
    /// `None` with fewer than two entries.
    pub fn trend(&self) -> Option<Trend> {
        if self.entries.len() < 2 {
            return None;
        }
        let newest = self.latest()?.value;
        let oldest = self.oldest()?.value;

        Some(if newest > oldest {
            Trend::Decreasing
        } else if newest < oldest {
            Trend::Increasing
        } else {
            Trend::Stable
        })
    }

    /// Entries oldest first, as plotted on the trend chart
    pub fn chronological(&self) -> Vec<HistoryEntry> {
        self.entries.iter().rev().cloned().collect()
    }

    /// The most recent `n` entries
    pub fn recent(&self, n: usize) -> &[HistoryEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Value-axis bounds for the trend chart, padded by 2 on each side
    pub fn chart_bounds(&self) -> Option<(f64, f64)> {
        let values = self.entries.iter().map(|e| e.value);
        let min = values.clone().reduce(f64::min)?;
        let max = values.reduce(f64::max)?;
        Some((min - CHART_PADDING, max + CHART_PADDING))
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Read the log from a store
    ///
    /// An absent key is an empty log. A malformed value is an error the caller
    /// is expected to recover from by starting empty.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self, StorageError> {
        let Some(raw) = store.get(HISTORY_KEY)? else {
            debug!("No stored history, starting empty");
            return Ok(Self::default());
        };

        let entries: Vec<HistoryEntry> =
            serde_json::from_str(&raw).map_err(|source| StorageError::Malformed {
                key: HISTORY_KEY.to_string(),
                source,
            })?;

        debug!(entries = entries.len(), "Loaded stored history");
        Ok(Self::from_entries(entries))
    }

    /// Write the log to a store; an empty log removes the key
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        if self.is_empty() {
            return store.remove(HISTORY_KEY);
        }
        let raw = serde_json::to_string(&self.entries).map_err(|e| StorageError::Backend(e.to_string()))?;
        store.set(HISTORY_KEY, &raw)
    }
}
