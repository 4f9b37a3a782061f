//! Tunable service settings

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// Default de-duplication window in seconds
pub const DEFAULT_DEDUP_WINDOW_SECS: u64 = 90;

/// Notification dispatcher settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// Trailing window within which identical notifications are suppressed
    pub dedup_window_secs: u64,
    /// Maximum number of notifications returned by a listing
    pub list_limit: usize,
}

impl NotificationSettings {
    pub fn dedup_window(&self) -> TimeDelta {
        i64::try_from(self.dedup_window_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX)
    }
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            dedup_window_secs: DEFAULT_DEDUP_WINDOW_SECS,
            list_limit: 50,
        }
    }
}

/// Export settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Prefix of generated file names (`<prefix>-<domain>.csv`)
    pub file_prefix: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            file_prefix: "lunaris".to_string(),
        }
    }
}
