//! 业务逻辑服务层

mod export_service;
mod notification_service;

pub use export_service::ExportService;
pub use notification_service::NotificationService;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::traits::{Clock, NotificationRepository, SystemClock};

/// 服务上下文 - 持有所有依赖
///
/// 平台层需要创建此上下文，并注入平台特定的存储实现。
pub struct ServiceContext {
    /// 通知持久化仓库
    notification_repository: Arc<dyn NotificationRepository>,
    /// 时间来源
    clock: Arc<dyn Clock>,
}

impl ServiceContext {
    /// 创建服务上下文（使用系统时钟）
    #[must_use]
    pub fn new(notification_repository: Arc<dyn NotificationRepository>) -> Self {
        Self {
            notification_repository,
            clock: Arc::new(SystemClock),
        }
    }

    /// 替换时间来源
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn notification_repository(&self) -> &Arc<dyn NotificationRepository> {
        &self.notification_repository
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// 当前时间
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}
