//! CSV export related types.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{DomainRecord, Roster};
use crate::utils::datetime::format_date_key;
use crate::utils::hours::decimal_hours;

/// MIME type of every export payload.
pub const CSV_MIME_TYPE: &str = "text/csv;charset=utf-8";

/// Separator between resolved names of a list-valued cell.
pub const LIST_SEPARATOR: &str = " / ";

/// Custom cell extraction.
pub type CellFn = Arc<dyn Fn(&DomainRecord, &Roster) -> Option<String> + Send + Sync>;

/// Where a column takes its value from.
#[derive(Clone)]
pub enum ColumnSource {
    /// Scalar field rendered verbatim
    Text(String),
    /// Single user id resolved through the roster
    Identity(String),
    /// List of user ids, resolved and joined with [`LIST_SEPARATOR`]
    IdentityList(String),
    /// Decimal hours between two `HH:MM` fields
    Hours { entry: String, exit: String },
    /// Arbitrary extraction
    Custom(CellFn),
}

impl fmt::Debug for ColumnSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(field) => f.debug_tuple("Text").field(field).finish(),
            Self::Identity(field) => f.debug_tuple("Identity").field(field).finish(),
            Self::IdentityList(field) => f.debug_tuple("IdentityList").field(field).finish(),
            Self::Hours { entry, exit } => f
                .debug_struct("Hours")
                .field("entry", entry)
                .field("exit", exit)
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// One output column: header label plus extraction.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub header: String,
    pub source: ColumnSource,
}

impl ColumnSpec {
    #[must_use]
    pub fn text(header: &str, field: &str) -> Self {
        Self::new(header, ColumnSource::Text(field.to_string()))
    }

    #[must_use]
    pub fn identity(header: &str, field: &str) -> Self {
        Self::new(header, ColumnSource::Identity(field.to_string()))
    }

    #[must_use]
    pub fn identity_list(header: &str, field: &str) -> Self {
        Self::new(header, ColumnSource::IdentityList(field.to_string()))
    }

    #[must_use]
    pub fn hours(header: &str, entry: &str, exit: &str) -> Self {
        Self::new(
            header,
            ColumnSource::Hours {
                entry: entry.to_string(),
                exit: exit.to_string(),
            },
        )
    }

    #[must_use]
    pub fn custom<F>(header: &str, extract: F) -> Self
    where
        F: Fn(&DomainRecord, &Roster) -> Option<String> + Send + Sync + 'static,
    {
        Self::new(header, ColumnSource::Custom(Arc::new(extract)))
    }

    fn new(header: &str, source: ColumnSource) -> Self {
        Self {
            header: header.to_string(),
            source,
        }
    }

    /// Cell text for `record`, before quoting.
    ///
    /// Missing or malformed values yield an empty string. Newlines are
    /// flattened to single spaces.
    pub fn extract(&self, record: &DomainRecord, roster: &Roster) -> String {
        let value = match &self.source {
            ColumnSource::Text(field) => record.text(field),
            ColumnSource::Identity(field) => record
                .text(field)
                .map(|id| roster.display_name(&id).to_string()),
            ColumnSource::IdentityList(field) => Some(
                record
                    .ids(field)
                    .iter()
                    .map(|id| roster.display_name(id))
                    .collect::<Vec<_>>()
                    .join(LIST_SEPARATOR),
            ),
            ColumnSource::Hours { entry, exit } => decimal_hours(
                record.text(entry).as_deref(),
                record.text(exit).as_deref(),
            ),
            ColumnSource::Custom(extract) => extract(record, roster),
        };
        value.unwrap_or_default().replace('\n', " ")
    }
}

/// Definition of an exportable table.
#[derive(Debug, Clone)]
pub struct ExportTable {
    /// Slug used in file names (`reuniones`, `horarios`, ...)
    pub domain: String,
    /// Human readable title
    pub title: String,
    /// Field holding the primary date key
    pub date_field: String,
    /// File stem used instead of `<prefix>-<domain>` for month windows
    pub monthly_stem: Option<String>,
    /// Fields identifying the people a record belongs to
    pub owner_fields: Vec<String>,
    pub columns: Vec<ColumnSpec>,
}

impl ExportTable {
    #[must_use]
    pub fn new(domain: &str, title: &str, date_field: &str) -> Self {
        Self {
            domain: domain.to_string(),
            title: title.to_string(),
            date_field: date_field.to_string(),
            monthly_stem: None,
            owner_fields: Vec::new(),
            columns: Vec::new(),
        }
    }

    #[must_use]
    pub fn monthly_stem(mut self, stem: &str) -> Self {
        self.monthly_stem = Some(stem.to_string());
        self
    }

    #[must_use]
    pub fn owners(mut self, fields: &[&str]) -> Self {
        self.owner_fields = fields.iter().map(ToString::to_string).collect();
        self
    }

    #[must_use]
    pub fn column(mut self, column: ColumnSpec) -> Self {
        self.columns.push(column);
        self
    }

    /// Whether `user_id` appears in any owner field of `record`
    pub fn is_owned_by(&self, record: &DomainRecord, user_id: &str) -> bool {
        self.owner_fields
            .iter()
            .any(|field| record.references(field, user_id))
    }
}

/// Time filter applied to the primary date key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ExportWindow {
    /// Inclusive date range
    Range { from: NaiveDate, to: NaiveDate },
    /// A whole calendar month
    Month { year: i32, month: u32 },
}

impl ExportWindow {
    #[must_use]
    pub fn range(from: NaiveDate, to: NaiveDate) -> Self {
        Self::Range { from, to }
    }

    pub fn month(year: i32, month: u32) -> CoreResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(CoreError::ValidationError(format!(
                "Month must be between 1 and 12, got {month}"
            )));
        }
        if !(0..=9999).contains(&year) {
            return Err(CoreError::ValidationError(format!(
                "Year must have four digits, got {year}"
            )));
        }
        Ok(Self::Month { year, month })
    }

    /// Inclusive `(from, to)` bounds as date-key strings.
    ///
    /// Month windows end on day 31, which bounds every month under string
    /// comparison.
    pub fn bounds(&self) -> (String, String) {
        match self {
            Self::Range { from, to } => (format_date_key(*from), format_date_key(*to)),
            Self::Month { year, month } => (
                format!("{year:04}-{month:02}-01"),
                format!("{year:04}-{month:02}-31"),
            ),
        }
    }

    pub fn contains(&self, date_key: &str) -> bool {
        let (from, to) = self.bounds();
        from.as_str() <= date_key && date_key <= to.as_str()
    }
}

/// Output of one export action. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    /// CSV text
    pub payload: String,
    pub suggested_file_name: String,
    pub display_title: String,
    /// Number of data rows in `payload`
    pub row_count: usize,
}

impl ExportResult {
    pub fn mime_type(&self) -> &'static str {
        CSV_MIME_TYPE
    }
}
