//! Subcommand handlers.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use lunaris_app::AppState;
use lunaris_core::presets;
use lunaris_core::types::{DomainRecord, Notification, Roster, SendOutcome};

use crate::cli::{ExportArgs, NotifyCommand};

pub fn run_export(state: &AppState, args: &ExportArgs) -> Result<()> {
    let table = presets::by_name(&args.table, args.hours)?;
    let window = args.window()?;
    let records = read_records(&args.records)?;
    let roster = match &args.roster {
        Some(path) => read_roster(path)?,
        None => Roster::new(),
    };

    let result = match args.viewer() {
        Some(viewer) => state.export_service.export_for(
            &viewer,
            &records,
            &table,
            &roster,
            window.as_ref(),
        ),
        None => state
            .export_service
            .export(&records, &table, &roster, window.as_ref()),
    };

    tracing::info!(
        "{}: {} of {} records exported",
        result.display_title,
        result.row_count,
        records.len()
    );

    match &args.output {
        Some(path) => {
            let path = if path.is_dir() {
                path.join(&result.suggested_file_name)
            } else {
                path.clone()
            };
            std::fs::write(&path, &result.payload)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {} ({})", path.display(), result.mime_type());
        }
        None => {
            write_payload(&mut std::io::stdout().lock(), &result.payload)?;
        }
    }

    Ok(())
}

pub async fn run_notify(state: &AppState, command: NotifyCommand) -> Result<()> {
    let svc = &state.notification_service;

    match command {
        NotifyCommand::Send { to, kind, message } => match svc.send(&message, &to, &kind).await? {
            SendOutcome::Sent(n) => println!("sent {}", n.id),
            SendOutcome::Suppressed => println!("suppressed (duplicate)"),
        },
        NotifyCommand::FanOut { to, kind, message } => {
            let result = svc.fan_out(&message, &to, &kind).await;
            println!(
                "sent {}, suppressed {}, failed {}",
                result.sent_count, result.suppressed_count, result.failed_count
            );
            for failure in &result.failures {
                println!("  {}: {}", failure.recipient_id, failure.reason);
            }
        }
        NotifyCommand::MarkRead { user, id } => {
            if svc.mark_read(&id, &user).await? {
                println!("marked {id} read");
            } else {
                println!("nothing to mark");
            }
        }
        NotifyCommand::MarkAllRead { user } => {
            let changed = svc.mark_all_read(&user).await?;
            println!("marked {changed} read");
        }
        NotifyCommand::Unread { user } => {
            println!("{}", svc.unread_count(&user).await?);
        }
        NotifyCommand::List { user, limit, json } => {
            let items = svc.list(&user, limit).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                for n in &items {
                    println!("{}", format_line(n));
                }
            }
        }
    }

    Ok(())
}

/// Payload is written as-is, with no trailing newline added.
fn write_payload<W: Write>(out: &mut W, payload: &str) -> Result<()> {
    out.write_all(payload.as_bytes())?;
    out.flush()?;
    Ok(())
}

fn format_line(n: &Notification) -> String {
    let marker = if n.read { ' ' } else { '*' };
    format!(
        "{marker} {} [{}] {} ({})",
        n.created_at.format("%Y-%m-%d %H:%M"),
        n.kind,
        n.message,
        n.id
    )
}

fn read_records(path: &Path) -> Result<Vec<DomainRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read records file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} must hold a JSON array of objects", path.display()))
}

fn read_roster(path: &Path) -> Result<Roster> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} must hold a JSON object of id to name", path.display()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use chrono::DateTime;
    use lunaris_core::types::NotificationType;

    #[test]
    fn records_and_roster_files_load() {
        let tmp = tempfile::tempdir().unwrap();
        let records_path = tmp.path().join("records.json");
        let roster_path = tmp.path().join("roster.json");
        std::fs::write(
            &records_path,
            r#"[{"dateKey":"2024-03-01","userId":"u1","entry":"09:00","exit":"13:00","status":"ok","note":"a,b"}]"#,
        )
        .unwrap();
        std::fs::write(&roster_path, r#"{"u1":"Ana"}"#).unwrap();

        let records = read_records(&records_path).unwrap();
        let roster = read_roster(&roster_path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text("note").as_deref(), Some("a,b"));
        assert_eq!(roster.display_name("u1"), "Ana");
    }

    #[test]
    fn non_array_records_file_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("records.json");
        std::fs::write(&path, r#"{"dateKey":"2024-03-01"}"#).unwrap();
        assert!(read_records(&path).is_err());
    }

    #[test]
    fn stdout_payload_is_unchanged() {
        let payload = "\"Fecha\",\"Nota\"\n\"2024-03-01\",\"a,b\"";
        let mut out = Vec::new();
        write_payload(&mut out, payload).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), payload);
    }

    #[test]
    fn list_line_marks_unread() {
        let n = Notification::new(
            "u1",
            "Hola",
            NotificationType::Reminder,
            DateTime::from_timestamp(1_709_287_200, 0).unwrap(),
        );
        let line = format_line(&n);
        assert!(line.starts_with("* 2024-03-01 10:00 [reminder] Hola"));
    }
}
