//! `SeaORM` entities backing `SqliteStore`.

pub mod notification;
