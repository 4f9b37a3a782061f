//! Built-in export tables, one per team-operations domain.

use crate::error::{CoreError, CoreResult};
use crate::types::{ColumnSpec, ExportTable};

pub const TIME_ENTRIES: &str = "horarios";
pub const MEETINGS: &str = "reuniones";
pub const TRAININGS: &str = "formaciones";
pub const ABSENCES: &str = "ausencias";
pub const TODOS: &str = "tareas";

/// Every preset slug, in menu order
pub const NAMES: [&str; 5] = [TIME_ENTRIES, MEETINGS, TRAININGS, ABSENCES, TODOS];

/// Clock-in/clock-out entries.
///
/// `include_hours` adds a derived decimal-hours column after the exit time.
pub fn time_entries(include_hours: bool) -> ExportTable {
    let mut table = ExportTable::new(TIME_ENTRIES, "Horarios", "dateKey")
        .monthly_stem(TIME_ENTRIES)
        .owners(&["userId"])
        .column(ColumnSpec::text("Fecha", "dateKey"))
        .column(ColumnSpec::identity("Persona", "userId"))
        .column(ColumnSpec::text("Entrada", "entry"))
        .column(ColumnSpec::text("Salida", "exit"));
    if include_hours {
        table = table.column(ColumnSpec::hours("Horas", "entry", "exit"));
    }
    table
        .column(ColumnSpec::text("Estado", "status"))
        .column(ColumnSpec::text("Nota", "note"))
}

pub fn meetings() -> ExportTable {
    ExportTable::new(MEETINGS, "Reuniones", "dateKey")
        .owners(&["requestedBy", "participants"])
        .column(ColumnSpec::text("Fecha", "dateKey"))
        .column(ColumnSpec::text("Hora", "startTime"))
        .column(ColumnSpec::text("Título", "title"))
        .column(ColumnSpec::text("Descripción", "description"))
        .column(ColumnSpec::identity("Solicitante", "requestedBy"))
        .column(ColumnSpec::identity_list("Participantes", "participants"))
        .column(ColumnSpec::text("Estado", "status"))
}

pub fn trainings() -> ExportTable {
    ExportTable::new(TRAININGS, "Formaciones", "dateKey")
        .owners(&["requestedBy"])
        .column(ColumnSpec::text("Fecha", "dateKey"))
        .column(ColumnSpec::text("Hora", "startTime"))
        .column(ColumnSpec::text("Tema", "title"))
        .column(ColumnSpec::identity("Solicitante", "requestedBy"))
        .column(ColumnSpec::text("Estado", "status"))
        .column(ColumnSpec::text("Notas", "notes"))
}

pub fn absences() -> ExportTable {
    ExportTable::new(ABSENCES, "Ausencias", "dateKey")
        .owners(&["userId"])
        .column(ColumnSpec::text("Fecha", "dateKey"))
        .column(ColumnSpec::identity("Persona", "userId"))
        .column(ColumnSpec::text("Motivo", "reason"))
        .column(ColumnSpec::text("Estado", "status"))
}

pub fn todos() -> ExportTable {
    ExportTable::new(TODOS, "Tareas", "dueDate")
        .owners(&["assignedTo", "createdBy"])
        .column(ColumnSpec::text("Fecha límite", "dueDate"))
        .column(ColumnSpec::text("Título", "title"))
        .column(ColumnSpec::text("Descripción", "description"))
        .column(ColumnSpec::identity_list("Asignados", "assignedTo"))
        .column(ColumnSpec::identity_list("Completado por", "completedBy"))
        .column(ColumnSpec::text("Prioridad", "priority"))
}

/// Look up a preset by slug
pub fn by_name(name: &str, include_hours: bool) -> CoreResult<ExportTable> {
    match name.trim().to_ascii_lowercase().as_str() {
        TIME_ENTRIES => Ok(time_entries(include_hours)),
        MEETINGS => Ok(meetings()),
        TRAININGS => Ok(trainings()),
        ABSENCES => Ok(absences()),
        TODOS => Ok(todos()),
        _ => Err(CoreError::UnknownExportTable(name.to_string())),
    }
}
