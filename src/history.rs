//! Persistent, capped log of past prediction results.

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::logging::{self, obj, v_str, Domain};
use crate::storage::KvStore;

pub const HISTORY_KEY: &str = "parkinsonResults";
pub const MAX_ENTRIES: usize = 100;
pub const DEFAULT_CHART_LIMIT: usize = 20;
pub const UNKNOWN_SEVERITY: &str = "unknown";

/// One recorded prediction event. Field names on disk match the layout
/// older clients wrote (`date`, `probability`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "date")]
    pub timestamp: String,
    pub prediction: i64,
    #[serde(rename = "probability")]
    pub probability_percent: i64,
    #[serde(default = "unknown_severity")]
    pub severity: String,
}

fn unknown_severity() -> String {
    UNKNOWN_SEVERITY.to_string()
}

impl HistoryEntry {
    pub fn new(timestamp: String, prediction: i64, probability_percent: i64, severity: &str) -> Self {
        let severity = severity.trim();
        Self {
            timestamp,
            prediction,
            probability_percent,
            severity: if severity.is_empty() { unknown_severity() } else { severity.to_string() },
        }
    }

    pub fn is_positive(&self) -> bool {
        self.prediction == 1
    }
}

/// Newest-first sequence of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    /// Insert at the front and drop the oldest entries past `cap`.
    pub fn push_front(&mut self, entry: HistoryEntry, cap: usize) {
        self.entries.insert(0, entry);
        self.entries.truncate(cap);
    }
}

impl From<Vec<HistoryEntry>> for HistoryLog {
    fn from(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }
}

// =============================================================================
// Clock
// =============================================================================

/// Source of the human-readable creation time stamped on new entries.
pub trait Clock {
    fn now(&self) -> String;
}

/// Local wall clock, formatted `M/D/YYYY, h:mm:ss AM`.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> String {
        Local::now().format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
    }
}

impl<F: Fn() -> String> Clock for F {
    fn now(&self) -> String {
        self()
    }
}

// =============================================================================
// Store
// =============================================================================

/// History log kept under a single key of a `KvStore`. Never fails
/// observably: unreadable data loads as an empty log and write failures
/// are logged.
pub struct HistoryStore<S> {
    store: S,
}

impl<S: KvStore> HistoryStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn load(&self) -> HistoryLog {
        let raw = match self.store.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return HistoryLog::new(),
            Err(err) => {
                logging::warn(Domain::Store, "history_read_failed", obj(&[("error", v_str(&err.to_string()))]));
                return HistoryLog::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(log) => log,
            Err(err) => {
                logging::warn(Domain::Store, "history_corrupt", obj(&[("error", v_str(&err.to_string()))]));
                HistoryLog::new()
            }
        }
    }

    pub fn save(&mut self, log: &HistoryLog) {
        let serialized = match serde_json::to_string(log) {
            Ok(s) => s,
            Err(err) => {
                logging::error(Domain::Store, "history_encode_failed", obj(&[("error", v_str(&err.to_string()))]));
                return;
            }
        };
        if let Err(err) = self.store.set(HISTORY_KEY, &serialized) {
            logging::error(Domain::Store, "history_write_failed", obj(&[("error", v_str(&err.to_string()))]));
            return;
        }
        logging::log(logging::Level::Debug, Domain::Store, "history_saved", obj(&[("entries", json!(log.len()))]));
    }

    pub fn clear(&mut self) {
        self.save(&HistoryLog::new());
        logging::info(Domain::History, "history_cleared", obj(&[]));
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
