//! Notification persistence abstract Trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::CoreResult;
use crate::types::{Notification, NotificationType};

/// Notification table Trait
///
/// Logical schema: `{id, user_id, message, type, read, created_at}`.
///
/// Platform implementation:
/// - `SqliteStore` (`SeaORM`, lunaris-app)
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Find a notification with identical recipient, message and type created
    /// at or after `since`.
    async fn find_recent_duplicate(
        &self,
        recipient_id: &str,
        message: &str,
        kind: NotificationType,
        since: DateTime<Utc>,
    ) -> CoreResult<Option<Notification>>;

    /// Insert a new row
    async fn insert(&self, notification: &Notification) -> CoreResult<()>;

    /// Notifications of a recipient, newest first
    ///
    /// # Arguments
    /// * `recipient_id` - Owner
    /// * `limit` - Maximum number of rows
    async fn find_by_recipient(
        &self,
        recipient_id: &str,
        limit: usize,
    ) -> CoreResult<Vec<Notification>>;

    /// Number of unread notifications of a recipient
    async fn count_unread(&self, recipient_id: &str) -> CoreResult<u64>;

    /// Mark every unread notification of a recipient as read.
    ///
    /// Returns the number of rows changed.
    async fn mark_all_read(&self, recipient_id: &str) -> CoreResult<u64>;

    /// Mark one notification as read, only if it belongs to `recipient_id`.
    ///
    /// Returns `true` if a row changed from unread to read.
    async fn mark_read(&self, notification_id: &str, recipient_id: &str) -> CoreResult<bool>;
}
