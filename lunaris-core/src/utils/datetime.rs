//! Date helpers.
//!
//! - Date keys: calendar dates as fixed-width `YYYY-MM-DD` strings, which
//!   order correctly under plain string comparison.
//! - Serde support for `DateTime<Utc>`: serialized as RFC3339, deserialized
//!   from RFC3339 or a Unix timestamp in milliseconds (the backend's
//!   `created_at` column can be either).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serializer};

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Formats a date as a date key.
pub fn format_date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Reduces a date or timestamp string to its date-key part.
///
/// `2024-03-01T09:00:00Z` and `2024-03-01 09:00` become `2024-03-01`;
/// anything else is returned trimmed but otherwise untouched.
pub fn normalize_date_key(raw: &str) -> &str {
    let raw = raw.trim();
    match raw.as_bytes().get(10) {
        Some(b'T' | b' ') => raw.get(..10).unwrap_or(raw),
        _ => raw,
    }
}

/// Spanish month name (1-based), used in export titles.
pub fn month_name_es(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTHS_ES.get(index).copied()
}

/// Serializes `DateTime<Utc>` as an RFC3339 string.
pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&dt.to_rfc3339())
}

/// Deserializes `DateTime<Utc>` from RFC3339 or Unix milliseconds.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MillisOrString {
        String(String),
        Millis(i64),
    }

    match MillisOrString::deserialize(deserializer)? {
        MillisOrString::String(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| Error::custom(format!("Invalid RFC3339 timestamp: {e}"))),
        MillisOrString::Millis(ms) => DateTime::from_timestamp_millis(ms)
            .ok_or_else(|| Error::custom("Invalid Unix timestamp")),
    }
}
