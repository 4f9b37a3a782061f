//! 类型定义模块

mod export;
mod notification;
mod record;
mod roster;
mod settings;

pub use export::{
    CellFn, ColumnSource, ColumnSpec, ExportResult, ExportTable, ExportWindow, CSV_MIME_TYPE,
    LIST_SEPARATOR,
};
pub use notification::{
    FanOutFailure, FanOutResult, Notification, NotificationType, SendOutcome,
};
pub use record::DomainRecord;
pub use roster::{Roster, Viewer};
pub use settings::{ExportSettings, NotificationSettings, DEFAULT_DEDUP_WINDOW_SECS};
