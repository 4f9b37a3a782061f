//! `NotificationRepository` implementation for `SqliteStore`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveValue::Set, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use lunaris_core::error::{CoreError, CoreResult};
use lunaris_core::traits::NotificationRepository;
use lunaris_core::types::{Notification, NotificationType};

use super::entity::notification;
use super::SqliteStore;

impl notification::Model {
    /// Convert a `SeaORM` row model into a domain `Notification`.
    ///
    /// Rows written by other clients may carry free-form types; they are
    /// normalized the same way as on send.
    fn into_notification(self) -> CoreResult<Notification> {
        let created_at = DateTime::<Utc>::from_timestamp_millis(self.created_at).ok_or_else(|| {
            CoreError::SerializationError(format!("Invalid created_at: {}", self.created_at))
        })?;

        Ok(Notification {
            id: self.id,
            recipient_id: self.user_id,
            message: self.message,
            kind: NotificationType::normalize(&self.kind),
            read: self.read,
            created_at,
        })
    }
}

/// Convert a domain `Notification` into a `SeaORM` active model for insert.
fn notification_to_active_model(n: &Notification) -> notification::ActiveModel {
    notification::ActiveModel {
        id: Set(n.id.clone()),
        user_id: Set(n.recipient_id.clone()),
        message: Set(n.message.clone()),
        kind: Set(n.kind.as_str().to_string()),
        read: Set(n.read),
        created_at: Set(n.created_at.timestamp_millis()),
    }
}

#[async_trait]
impl NotificationRepository for SqliteStore {
    async fn find_recent_duplicate(
        &self,
        recipient_id: &str,
        message: &str,
        kind: NotificationType,
        since: DateTime<Utc>,
    ) -> CoreResult<Option<Notification>> {
        let row = notification::Entity::find()
            .filter(notification::Column::UserId.eq(recipient_id))
            .filter(notification::Column::Message.eq(message))
            .filter(notification::Column::Kind.eq(kind.as_str()))
            .filter(notification::Column::CreatedAt.gte(since.timestamp_millis()))
            .one(&self.db)
            .await
            .map_err(|e| {
                CoreError::StorageError(format!("Failed to query recent notifications: {e}"))
            })?;

        row.map(notification::Model::into_notification).transpose()
    }

    async fn insert(&self, notification: &Notification) -> CoreResult<()> {
        notification::Entity::insert(notification_to_active_model(notification))
            .exec(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to insert notification: {e}")))?;

        Ok(())
    }

    async fn find_by_recipient(
        &self,
        recipient_id: &str,
        limit: usize,
    ) -> CoreResult<Vec<Notification>> {
        let rows = notification::Entity::find()
            .filter(notification::Column::UserId.eq(recipient_id))
            .order_by_desc(notification::Column::CreatedAt)
            .limit(u64::try_from(limit).unwrap_or(u64::MAX))
            .all(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query notifications: {e}")))?;

        rows.into_iter()
            .map(notification::Model::into_notification)
            .collect()
    }

    async fn count_unread(&self, recipient_id: &str) -> CoreResult<u64> {
        notification::Entity::find()
            .filter(notification::Column::UserId.eq(recipient_id))
            .filter(notification::Column::Read.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to count notifications: {e}")))
    }

    async fn mark_all_read(&self, recipient_id: &str) -> CoreResult<u64> {
        let result = notification::Entity::update_many()
            .col_expr(notification::Column::Read, Expr::value(true))
            .filter(notification::Column::UserId.eq(recipient_id))
            .filter(notification::Column::Read.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| {
                CoreError::StorageError(format!("Failed to mark notifications read: {e}"))
            })?;

        Ok(result.rows_affected)
    }

    async fn mark_read(&self, notification_id: &str, recipient_id: &str) -> CoreResult<bool> {
        let result = notification::Entity::update_many()
            .col_expr(notification::Column::Read, Expr::value(true))
            .filter(notification::Column::Id.eq(notification_id))
            .filter(notification::Column::UserId.eq(recipient_id))
            .filter(notification::Column::Read.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| {
                CoreError::StorageError(format!("Failed to mark notification read: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }
}
