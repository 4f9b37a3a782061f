//! Helper utilities

pub mod csv;
pub mod datetime;
pub mod hours;
