//! Lunaris Core Library
//!
//! Provides the core business logic of the Lunaris team-operations app:
//! - Tabular CSV export of domain records (Export Service, built-in presets)
//! - Notification dispatch with de-duplication and fan-out (Notification Service)
//!
//! This library is platform-independent: records are fetched by the caller
//! and notifications are persisted through the `NotificationRepository` trait.

pub mod error;
pub mod presets;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::{ExportService, NotificationService, ServiceContext};
pub use traits::{Clock, NotificationRepository, SystemClock};
