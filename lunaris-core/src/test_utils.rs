//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::{Notify, RwLock};

use crate::error::{CoreError, CoreResult};
use crate::services::{NotificationService, ServiceContext};
use crate::traits::{Clock, NotificationRepository};
use crate::types::{Notification, NotificationSettings, NotificationType};

// ===== ManualClock =====

/// Clock that only moves when told to
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *now += TimeDelta::seconds(secs);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(DateTime::from_timestamp(1_709_287_200, 0).unwrap_or_default())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

// ===== MockNotificationRepository =====

pub struct MockNotificationRepository {
    rows: RwLock<Vec<Notification>>,
    /// 如果 Some，insert 时返回此错误
    insert_error: RwLock<Option<String>>,
    /// insert 对这些收件人失败（用于测试群发的部分失败）
    failing_recipients: RwLock<HashSet<String>>,
}

impl MockNotificationRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            insert_error: RwLock::new(None),
            failing_recipients: RwLock::new(HashSet::new()),
        }
    }

    pub async fn set_insert_error(&self, err: Option<String>) {
        *self.insert_error.write().await = err;
    }

    pub async fn fail_inserts_for(&self, recipient_id: &str) {
        self.failing_recipients
            .write()
            .await
            .insert(recipient_id.to_string());
    }

    pub async fn all(&self) -> Vec<Notification> {
        self.rows.read().await.clone()
    }

    pub async fn find(&self, id: &str) -> Option<Notification> {
        self.rows.read().await.iter().find(|n| n.id == id).cloned()
    }
}

#[async_trait]
impl NotificationRepository for MockNotificationRepository {
    async fn find_recent_duplicate(
        &self,
        recipient_id: &str,
        message: &str,
        kind: NotificationType,
        since: DateTime<Utc>,
    ) -> CoreResult<Option<Notification>> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .find(|n| {
                n.recipient_id == recipient_id
                    && n.message == message
                    && n.kind == kind
                    && n.created_at >= since
            })
            .cloned())
    }

    async fn insert(&self, notification: &Notification) -> CoreResult<()> {
        if let Some(ref msg) = *self.insert_error.read().await {
            return Err(CoreError::StorageError(msg.clone()));
        }
        if self
            .failing_recipients
            .read()
            .await
            .contains(&notification.recipient_id)
        {
            return Err(CoreError::StorageError(format!(
                "insert rejected for {}",
                notification.recipient_id
            )));
        }
        self.rows.write().await.push(notification.clone());
        Ok(())
    }

    async fn find_by_recipient(
        &self,
        recipient_id: &str,
        limit: usize,
    ) -> CoreResult<Vec<Notification>> {
        let mut rows: Vec<Notification> = self
            .rows
            .read()
            .await
            .iter()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn count_unread(&self, recipient_id: &str) -> CoreResult<u64> {
        let count = self
            .rows
            .read()
            .await
            .iter()
            .filter(|n| n.recipient_id == recipient_id && !n.read)
            .count();
        Ok(count as u64)
    }

    async fn mark_all_read(&self, recipient_id: &str) -> CoreResult<u64> {
        let mut changed = 0;
        for n in self.rows.write().await.iter_mut() {
            if n.recipient_id == recipient_id && !n.read {
                n.read = true;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn mark_read(&self, notification_id: &str, recipient_id: &str) -> CoreResult<bool> {
        let mut rows = self.rows.write().await;
        match rows
            .iter_mut()
            .find(|n| n.id == notification_id && n.recipient_id == recipient_id && !n.read)
        {
            Some(n) => {
                n.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ===== GatedCountRepository =====

/// Wraps the mock; the first `count_unread` pauses after counting until
/// `release` is notified, signalling `counted` once the value is taken.
pub struct GatedCountRepository {
    pub inner: MockNotificationRepository,
    pub counted: Notify,
    pub release: Notify,
    armed: AtomicBool,
}

impl GatedCountRepository {
    pub fn new() -> Self {
        Self {
            inner: MockNotificationRepository::new(),
            counted: Notify::new(),
            release: Notify::new(),
            armed: AtomicBool::new(true),
        }
    }
}

#[async_trait]
impl NotificationRepository for GatedCountRepository {
    async fn find_recent_duplicate(
        &self,
        recipient_id: &str,
        message: &str,
        kind: NotificationType,
        since: DateTime<Utc>,
    ) -> CoreResult<Option<Notification>> {
        self.inner
            .find_recent_duplicate(recipient_id, message, kind, since)
            .await
    }

    async fn insert(&self, notification: &Notification) -> CoreResult<()> {
        self.inner.insert(notification).await
    }

    async fn find_by_recipient(
        &self,
        recipient_id: &str,
        limit: usize,
    ) -> CoreResult<Vec<Notification>> {
        self.inner.find_by_recipient(recipient_id, limit).await
    }

    async fn count_unread(&self, recipient_id: &str) -> CoreResult<u64> {
        let count = self.inner.count_unread(recipient_id).await?;
        if self.armed.swap(false, Ordering::SeqCst) {
            self.counted.notify_one();
            self.release.notified().await;
        }
        Ok(count)
    }

    async fn mark_all_read(&self, recipient_id: &str) -> CoreResult<u64> {
        self.inner.mark_all_read(recipient_id).await
    }

    async fn mark_read(&self, notification_id: &str, recipient_id: &str) -> CoreResult<bool> {
        self.inner.mark_read(notification_id, recipient_id).await
    }
}

// ===== Factories =====

/// Notification service over a mock repository and a manual clock
pub fn create_test_notification_service() -> (
    NotificationService,
    Arc<MockNotificationRepository>,
    Arc<ManualClock>,
) {
    let repo = Arc::new(MockNotificationRepository::new());
    let clock = Arc::new(ManualClock::default());
    let ctx = Arc::new(ServiceContext::new(repo.clone()).with_clock(clock.clone()));
    let svc = NotificationService::new(ctx, NotificationSettings::default());
    (svc, repo, clock)
}
