//! Platform-agnostic application bootstrap for Lunaris.
//!
//! Provides `AppState` (service container) and `AppStateBuilder` (adapter
//! injection). Front ends construct the state once at startup.

pub mod adapters;

use std::sync::Arc;

use lunaris_core::error::{CoreError, CoreResult};
use lunaris_core::services::{ExportService, NotificationService, ServiceContext};
use lunaris_core::traits::{Clock, NotificationRepository};
use lunaris_core::types::{ExportSettings, NotificationSettings};

/// Platform-agnostic application state.
///
/// Holds all services and the `ServiceContext`.
pub struct AppState {
    /// Service context (holds the storage adapter and clock)
    pub ctx: Arc<ServiceContext>,
    /// CSV export service
    pub export_service: ExportService,
    /// Notification service
    pub notification_service: Arc<NotificationService>,
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Required adapters
/// - `notification_repository` — where notifications are stored
///
/// # Optional
/// - `clock` — defaults to the system clock
/// - `notification_settings`, `export_settings` — default values
pub struct AppStateBuilder {
    notification_repository: Option<Arc<dyn NotificationRepository>>,
    clock: Option<Arc<dyn Clock>>,
    notification_settings: NotificationSettings,
    export_settings: ExportSettings,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            notification_repository: None,
            clock: None,
            notification_settings: NotificationSettings::default(),
            export_settings: ExportSettings::default(),
        }
    }

    #[must_use]
    pub fn notification_repository(mut self, repo: Arc<dyn NotificationRepository>) -> Self {
        self.notification_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    #[must_use]
    pub fn notification_settings(mut self, settings: NotificationSettings) -> Self {
        self.notification_settings = settings;
        self
    }

    #[must_use]
    pub fn export_settings(mut self, settings: ExportSettings) -> Self {
        self.export_settings = settings;
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required adapters are missing
    /// or the settings are unusable.
    pub fn build(self) -> CoreResult<AppState> {
        let notification_repository = self.notification_repository.ok_or_else(|| {
            CoreError::ValidationError("notification_repository is required".to_string())
        })?;

        if self.notification_settings.list_limit == 0 {
            return Err(CoreError::ValidationError(
                "notifications.list_limit must be greater than zero".to_string(),
            ));
        }
        if self.export_settings.file_prefix.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "export.file_prefix cannot be empty".to_string(),
            ));
        }

        let mut ctx = ServiceContext::new(notification_repository);
        if let Some(clock) = self.clock {
            ctx = ctx.with_clock(clock);
        }
        let ctx = Arc::new(ctx);

        log::info!(
            "Notification de-duplication window: {}s",
            self.notification_settings.dedup_window_secs
        );

        let export_service = ExportService::new(self.export_settings);
        let notification_service = Arc::new(NotificationService::new(
            Arc::clone(&ctx),
            self.notification_settings,
        ));

        Ok(AppState {
            ctx,
            export_service,
            notification_service,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
