//! Notification types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Notification category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    #[default]
    Info,
    Success,
    Error,
    ActionRequired,
    Reminder,
    Recognition,
    Shock,
}

impl NotificationType {
    pub const ALL: [Self; 7] = [
        Self::Info,
        Self::Success,
        Self::Error,
        Self::ActionRequired,
        Self::Reminder,
        Self::Recognition,
        Self::Shock,
    ];

    /// Storage / wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
            Self::ActionRequired => "action_required",
            Self::Reminder => "reminder",
            Self::Recognition => "recognition",
            Self::Shock => "shock",
        }
    }

    /// Map free-form input onto a known type.
    ///
    /// Case and surrounding whitespace are ignored, `-` and spaces count as
    /// `_`. Anything unrecognized becomes [`NotificationType::Info`].
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        let canonical: String = raw
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                other => other.to_ascii_lowercase(),
            })
            .collect();

        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == canonical)
            .unwrap_or_default()
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted notification row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Notification ID (UUID)
    pub id: String,
    /// Owner of the notification
    pub recipient_id: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    #[serde(default)]
    pub read: bool,
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// New unread notification with a fresh id
    #[must_use]
    pub fn new(
        recipient_id: &str,
        message: &str,
        kind: NotificationType,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            recipient_id: recipient_id.to_string(),
            message: message.to_string(),
            kind,
            read: false,
            created_at,
        }
    }
}

/// Result of a single send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// A new row was stored
    Sent(Notification),
    /// An identical notification was sent recently; nothing stored
    Suppressed,
}

impl SendOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent(_))
    }

    pub fn notification(&self) -> Option<&Notification> {
        match self {
            Self::Sent(n) => Some(n),
            Self::Suppressed => None,
        }
    }
}

/// Fan-out failure details
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FanOutFailure {
    pub recipient_id: String,
    pub reason: String,
}

/// Summary of a fan-out
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FanOutResult {
    pub sent_count: usize,
    pub suppressed_count: usize,
    pub failed_count: usize,
    pub failures: Vec<FanOutFailure>,
}
