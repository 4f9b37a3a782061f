//! 通知服务：去重发送、群发、已读管理

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{
    FanOutFailure, FanOutResult, Notification, NotificationSettings, NotificationType,
    SendOutcome,
};

/// Notification dispatcher
///
/// Suppresses identical notifications (same recipient, message and type)
/// sent within the configured window, and keeps a per-recipient cache of
/// unread counts that every write invalidates.
pub struct NotificationService {
    ctx: Arc<ServiceContext>,
    settings: NotificationSettings,
    unread_cache: RwLock<UnreadCache>,
}

/// Cached unread counts per recipient.
///
/// Every invalidation bumps the recipient's generation; a count fetched
/// under an older generation is discarded instead of cached.
#[derive(Default)]
struct UnreadCache {
    counts: HashMap<String, u64>,
    generations: HashMap<String, u64>,
}

impl UnreadCache {
    fn generation(&self, recipient_id: &str) -> u64 {
        self.generations.get(recipient_id).copied().unwrap_or(0)
    }
}

impl NotificationService {
    /// 创建通知服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, settings: NotificationSettings) -> Self {
        Self {
            ctx,
            settings,
            unread_cache: RwLock::new(UnreadCache::default()),
        }
    }

    /// Send one notification unless an identical one is recent.
    ///
    /// `kind` is normalized; unknown values become `info`. Storage errors
    /// are returned as-is.
    pub async fn send(
        &self,
        message: &str,
        recipient_id: &str,
        kind: &str,
    ) -> CoreResult<SendOutcome> {
        if recipient_id.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Recipient cannot be empty".to_string(),
            ));
        }
        if message.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Message cannot be empty".to_string(),
            ));
        }

        let kind = NotificationType::normalize(kind);
        let now = self.ctx.now();
        let since = now
            .checked_sub_signed(self.settings.dedup_window())
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let repository = self.ctx.notification_repository();

        if let Some(existing) = repository
            .find_recent_duplicate(recipient_id, message, kind, since)
            .await?
        {
            log::debug!(
                "Suppressed duplicate {kind} notification for {recipient_id} (matches {})",
                existing.id
            );
            return Ok(SendOutcome::Suppressed);
        }

        let notification = Notification::new(recipient_id, message, kind, now);
        repository.insert(&notification).await?;
        self.invalidate(recipient_id).await;

        log::info!(
            "Notification {} ({kind}) sent to {recipient_id}",
            notification.id
        );
        Ok(SendOutcome::Sent(notification))
    }

    /// Send the same notification to several recipients.
    ///
    /// Sends run concurrently and independently; every recipient is
    /// attempted and failures are reported, not rolled back.
    pub async fn fan_out(
        &self,
        message: &str,
        recipient_ids: &[String],
        kind: &str,
    ) -> FanOutResult {
        let sends = recipient_ids.iter().map(|recipient_id| async move {
            (recipient_id, self.send(message, recipient_id, kind).await)
        });
        let outcomes = futures::future::join_all(sends).await;

        let mut result = FanOutResult::default();
        for (recipient_id, outcome) in outcomes {
            match outcome {
                Ok(SendOutcome::Sent(_)) => result.sent_count += 1,
                Ok(SendOutcome::Suppressed) => result.suppressed_count += 1,
                Err(e) => {
                    if e.is_expected() {
                        log::warn!("Fan-out to {recipient_id} failed: {e}");
                    } else {
                        log::error!("Fan-out to {recipient_id} failed: {e}");
                    }
                    result.failures.push(FanOutFailure {
                        recipient_id: recipient_id.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        result.failed_count = result.failures.len();

        log::info!(
            "Fan-out finished: {} sent, {} suppressed, {} failed",
            result.sent_count,
            result.suppressed_count,
            result.failed_count
        );
        result
    }

    /// Mark every unread notification of `recipient_id` as read.
    ///
    /// Returns the number of notifications changed; zero when nothing was
    /// unread.
    pub async fn mark_all_read(&self, recipient_id: &str) -> CoreResult<u64> {
        let changed = self
            .ctx
            .notification_repository()
            .mark_all_read(recipient_id)
            .await?;
        self.invalidate(recipient_id).await;

        if changed > 0 {
            log::info!("Marked {changed} notifications read for {recipient_id}");
        }
        Ok(changed)
    }

    /// Mark one notification as read.
    ///
    /// Only the recipient's own notifications can change; anything else
    /// (unknown id, another recipient's notification, already read) is a
    /// no-op returning `false`.
    pub async fn mark_read(&self, notification_id: &str, recipient_id: &str) -> CoreResult<bool> {
        let changed = self
            .ctx
            .notification_repository()
            .mark_read(notification_id, recipient_id)
            .await?;

        if changed {
            self.invalidate(recipient_id).await;
        } else {
            log::debug!("mark_read({notification_id}) by {recipient_id} changed nothing");
        }
        Ok(changed)
    }

    /// Number of unread notifications of `recipient_id`
    pub async fn unread_count(&self, recipient_id: &str) -> CoreResult<u64> {
        let generation = {
            let cache = self.unread_cache.read().await;
            if let Some(count) = cache.counts.get(recipient_id) {
                return Ok(*count);
            }
            cache.generation(recipient_id)
        };

        let count = self
            .ctx
            .notification_repository()
            .count_unread(recipient_id)
            .await?;

        let mut cache = self.unread_cache.write().await;
        if cache.generation(recipient_id) == generation {
            cache.counts.insert(recipient_id.to_string(), count);
        }
        Ok(count)
    }

    /// Newest-first notifications of `recipient_id`.
    ///
    /// `limit` defaults to the configured listing limit.
    pub async fn list(
        &self,
        recipient_id: &str,
        limit: Option<usize>,
    ) -> CoreResult<Vec<Notification>> {
        let limit = limit.unwrap_or(self.settings.list_limit);
        self.ctx
            .notification_repository()
            .find_by_recipient(recipient_id, limit)
            .await
    }

    async fn invalidate(&self, recipient_id: &str) {
        let mut cache = self.unread_cache.write().await;
        cache.counts.remove(recipient_id);
        let generation = cache.generations.entry(recipient_id.to_string()).or_default();
        *generation = generation.wrapping_add(1);
    }
}
