//! CSV 导出服务

use crate::presets;
use crate::types::{
    DomainRecord, ExportResult, ExportSettings, ExportTable, ExportWindow, Roster, Viewer,
};
use crate::utils::csv;
use crate::utils::datetime::month_name_es;

/// Tabular exporter: records + column table → CSV payload.
///
/// Pure and synchronous; records are fetched by the caller.
pub struct ExportService {
    settings: ExportSettings,
}

impl ExportService {
    /// 创建导出服务实例
    #[must_use]
    pub fn new(settings: ExportSettings) -> Self {
        Self { settings }
    }

    /// Export `records` using `table`.
    ///
    /// With a window, only records whose date key falls inside it are kept.
    /// Rows are stably sorted by date key. Never fails: malformed fields
    /// become empty cells.
    pub fn export<'a, I>(
        &self,
        records: I,
        table: &ExportTable,
        roster: &Roster,
        window: Option<&ExportWindow>,
    ) -> ExportResult
    where
        I: IntoIterator<Item = &'a DomainRecord>,
    {
        let mut rows: Vec<(String, &DomainRecord)> = records
            .into_iter()
            .filter_map(|record| {
                let key = record.date_key(&table.date_field);
                match window {
                    Some(window) => key.filter(|k| window.contains(k)).map(|k| (k, record)),
                    None => Some((key.unwrap_or_default(), record)),
                }
            })
            .collect();

        // sort_by is stable: equal date keys keep input order
        rows.sort_by(|a, b| a.0.cmp(&b.0));

        let mut lines = Vec::with_capacity(rows.len() + 1);
        lines.push(csv::encode_row(
            table.columns.iter().map(|column| column.header.as_str()),
        ));
        for (_, record) in &rows {
            lines.push(csv::encode_row(
                table
                    .columns
                    .iter()
                    .map(|column| column.extract(record, roster)),
            ));
        }

        log::debug!(
            "Exported {} rows for table '{}' (window: {:?})",
            rows.len(),
            table.domain,
            window
        );

        ExportResult {
            payload: lines.join("\n"),
            suggested_file_name: self.file_name(table, window),
            display_title: Self::title(table, window),
            row_count: rows.len(),
        }
    }

    /// Export restricted to what `viewer` may see.
    ///
    /// Admins see every record, training managers every training request,
    /// everyone else only records they own.
    pub fn export_for(
        &self,
        viewer: &Viewer,
        records: &[DomainRecord],
        table: &ExportTable,
        roster: &Roster,
        window: Option<&ExportWindow>,
    ) -> ExportResult {
        let sees_all = viewer.is_admin
            || (viewer.is_training_manager && table.domain == presets::TRAININGS);

        if sees_all {
            return self.export(records, table, roster, window);
        }

        let visible = records
            .iter()
            .filter(|record| table.is_owned_by(record, &viewer.user_id));
        self.export(visible, table, roster, window)
    }

    fn file_name(&self, table: &ExportTable, window: Option<&ExportWindow>) -> String {
        let base = format!("{}-{}", self.settings.file_prefix, table.domain);
        match window {
            None => format!("{base}.csv"),
            Some(ExportWindow::Month { year, month }) => {
                let month = month_label(*month);
                match &table.monthly_stem {
                    Some(stem) => format!("{stem}-{month}-{year}.csv"),
                    None => format!("{base}-{month}-{year}.csv"),
                }
            }
            Some(window @ ExportWindow::Range { .. }) => {
                let (from, to) = window.bounds();
                format!("{base}-{from}_{to}.csv")
            }
        }
    }

    fn title(table: &ExportTable, window: Option<&ExportWindow>) -> String {
        match window {
            None => table.title.clone(),
            Some(ExportWindow::Month { year, month }) => {
                format!("{} {} {year}", table.title, month_label(*month))
            }
            Some(window @ ExportWindow::Range { .. }) => {
                let (from, to) = window.bounds();
                format!("{} ({from} – {to})", table.title)
            }
        }
    }
}

impl Default for ExportService {
    fn default() -> Self {
        Self::new(ExportSettings::default())
    }
}

fn month_label(month: u32) -> String {
    month_name_es(month).map_or_else(|| month.to_string(), ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnSpec;
    use crate::utils::csv::{decode_row, unescape_cell};
    use chrono::NaiveDate;
    use serde_json::json;

    fn roster() -> Roster {
        [("u1", "Ana"), ("u2", "Luis")].into_iter().collect()
    }

    fn entry(date: &str, user: &str, note: &str) -> DomainRecord {
        DomainRecord::new()
            .with("dateKey", date)
            .with("userId", user)
            .with("entry", "09:00")
            .with("exit", "13:00")
            .with("status", "ok")
            .with("note", note)
    }

    fn simple_table() -> ExportTable {
        ExportTable::new("notas", "Notas", "dateKey")
            .owners(&["userId"])
            .column(ColumnSpec::text("Fecha", "dateKey"))
            .column(ColumnSpec::text("Nota", "note"))
    }

    fn data_rows(result: &ExportResult) -> Vec<Vec<String>> {
        result.payload.lines().skip(1).map(decode_row).collect()
    }

    #[test]
    fn time_entry_scenario_matches_expected_payload() {
        let records = vec![entry("2024-03-01", "u1", "a,b")];
        let result = ExportService::default().export(
            &records,
            &presets::time_entries(false),
            &roster(),
            None,
        );

        assert_eq!(
            result.payload,
            "\"Fecha\",\"Persona\",\"Entrada\",\"Salida\",\"Estado\",\"Nota\"\n\
             \"2024-03-01\",\"Ana\",\"09:00\",\"13:00\",\"ok\",\"a,b\""
        );
        assert_eq!(result.suggested_file_name, "lunaris-horarios.csv");
        assert_eq!(result.display_title, "Horarios");
        assert_eq!(result.row_count, 1);
        assert_eq!(result.mime_type(), "text/csv;charset=utf-8");
    }

    #[test]
    fn empty_input_yields_header_only() {
        let records: Vec<DomainRecord> = Vec::new();
        let result = ExportService::default().export(&records, &simple_table(), &roster(), None);
        assert_eq!(result.payload, "\"Fecha\",\"Nota\"");
        assert_eq!(result.row_count, 0);
    }

    #[test]
    fn equal_date_keys_keep_input_order() {
        let records = vec![
            entry("2024-03-02", "u1", "third"),
            entry("2024-03-01", "u1", "first"),
            entry("2024-03-02", "u1", "fourth"),
            entry("2024-03-01", "u1", "second"),
        ];
        let result = ExportService::default().export(&records, &simple_table(), &roster(), None);
        let notes: Vec<String> = data_rows(&result).into_iter().map(|r| r[1].clone()).collect();
        assert_eq!(notes, vec!["first", "second", "third", "fourth"]);
    }

    #[test]
    fn window_filter_is_inclusive_and_drops_undated() {
        let records = vec![
            entry("2024-02-29", "u1", "before"),
            entry("2024-03-01", "u1", "from"),
            entry("2024-03-15", "u1", "middle"),
            entry("2024-03-31", "u1", "to"),
            entry("2024-04-01", "u1", "after"),
            DomainRecord::new().with("note", "undated"),
        ];
        let window = ExportWindow::range(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        );
        let result =
            ExportService::default().export(&records, &simple_table(), &roster(), Some(&window));
        let notes: Vec<String> = data_rows(&result).into_iter().map(|r| r[1].clone()).collect();
        assert_eq!(notes, vec!["from", "middle", "to"]);
        assert_eq!(result.suggested_file_name, "lunaris-notas-2024-03-01_2024-03-31.csv");
        assert_eq!(result.display_title, "Notas (2024-03-01 – 2024-03-31)");
    }

    #[test]
    fn no_window_keeps_undated_records_first() {
        let records = vec![
            entry("2024-03-01", "u1", "dated"),
            DomainRecord::new().with("note", "undated"),
        ];
        let result = ExportService::default().export(&records, &simple_table(), &roster(), None);
        let notes: Vec<String> = data_rows(&result).into_iter().map(|r| r[1].clone()).collect();
        assert_eq!(notes, vec!["undated", "dated"]);
    }

    #[test]
    fn unknown_identities_pass_through() {
        let records = vec![entry("2024-03-01", "ghost", "")];
        let result = ExportService::default().export(
            &records,
            &presets::time_entries(false),
            &roster(),
            None,
        );
        assert_eq!(data_rows(&result)[0][1], "ghost");
    }

    #[test]
    fn awkward_cells_survive_quoting() {
        let note = "comma, \"quote\"\nnewline";
        let records = vec![entry("2024-03-01", "u1", note)];
        let result = ExportService::default().export(&records, &simple_table(), &roster(), None);

        let line = result.payload.lines().nth(1).unwrap();
        assert!(line.ends_with(r#","comma, ""quote"" newline""#));
        assert_eq!(data_rows(&result)[0][1], note.replace('\n', " "));
        assert_eq!(
            unescape_cell(&csv::escape_cell(&note.replace('\n', " "))),
            note.replace('\n', " ")
        );
    }

    #[test]
    fn malformed_field_only_blanks_its_cell() {
        let records = vec![entry("2024-03-01", "u1", "").with("note", json!({"x": 1}))];
        let result = ExportService::default().export(&records, &simple_table(), &roster(), None);
        assert_eq!(data_rows(&result), vec![vec!["2024-03-01", ""]]);
    }

    #[test]
    fn month_window_uses_monthly_stem() {
        let records = vec![entry("2024-03-05", "u1", ""), entry("2024-04-01", "u1", "")];
        let window = ExportWindow::month(2024, 3).unwrap();
        let result = ExportService::default().export(
            &records,
            &presets::time_entries(true),
            &roster(),
            Some(&window),
        );
        assert_eq!(result.row_count, 1);
        assert_eq!(result.suggested_file_name, "horarios-marzo-2024.csv");
        assert_eq!(result.display_title, "Horarios marzo 2024");
    }

    #[test]
    fn month_window_without_stem_uses_prefix() {
        let service = ExportService::new(ExportSettings {
            file_prefix: "solaris".to_string(),
        });
        let window = ExportWindow::month(2025, 12).unwrap();
        let records: Vec<DomainRecord> = Vec::new();
        let result = service.export(&records, &simple_table(), &roster(), Some(&window));
        assert_eq!(result.suggested_file_name, "solaris-notas-diciembre-2025.csv");
    }

    #[test]
    fn members_only_export_their_own_records() {
        let records = vec![
            entry("2024-03-01", "u1", "mine"),
            entry("2024-03-02", "u2", "theirs"),
        ];
        let service = ExportService::default();
        let table = simple_table();

        let mine = service.export_for(&Viewer::member("u1"), &records, &table, &roster(), None);
        assert_eq!(mine.row_count, 1);
        assert_eq!(data_rows(&mine)[0][1], "mine");

        let all = service.export_for(&Viewer::admin("u1"), &records, &table, &roster(), None);
        assert_eq!(all.row_count, 2);
    }

    #[test]
    fn training_managers_see_all_training_requests_only() {
        let trainings = vec![
            DomainRecord::new()
                .with("dateKey", "2024-03-01")
                .with("requestedBy", "u2"),
        ];
        let absences = vec![
            DomainRecord::new()
                .with("dateKey", "2024-03-01")
                .with("userId", "u2"),
        ];
        let service = ExportService::default();
        let viewer = Viewer::training_manager("u1");

        let result = service.export_for(&viewer, &trainings, &presets::trainings(), &roster(), None);
        assert_eq!(result.row_count, 1);

        let result = service.export_for(&viewer, &absences, &presets::absences(), &roster(), None);
        assert_eq!(result.row_count, 0);
    }
}
