//! Storage layer abstraction trait definition

mod clock;
mod notification_repository;

pub use clock::{Clock, SystemClock};
pub use notification_repository::NotificationRepository;
