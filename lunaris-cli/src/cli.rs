use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use lunaris_core::types::{ExportWindow, Viewer};

/// Lunaris - team operations exports and notifications
#[derive(Parser, Debug)]
#[command(name = "lunaris")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the notification database path
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export records to CSV
    Export(ExportArgs),

    /// Notification operations
    #[command(subcommand)]
    Notify(NotifyCommand),
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Table preset (horarios, reuniones, formaciones, ausencias, tareas)
    pub table: String,

    /// JSON file holding an array of records
    #[arg(long)]
    pub records: PathBuf,

    /// JSON object file mapping user id to display name
    #[arg(long)]
    pub roster: Option<PathBuf>,

    /// Add the decimal hours column (horarios only)
    #[arg(long)]
    pub hours: bool,

    /// Export a whole month (requires --year)
    #[arg(long, requires = "year", conflicts_with_all = ["from", "to"])]
    pub month: Option<u32>,

    #[arg(long, requires = "month")]
    pub year: Option<i32>,

    /// First day of an inclusive range (YYYY-MM-DD, requires --to)
    #[arg(long, requires = "to")]
    pub from: Option<NaiveDate>,

    /// Last day of an inclusive range (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,

    /// Restrict rows to what this user may see
    #[arg(long)]
    pub viewer: Option<String>,

    /// Viewer is an administrator
    #[arg(long, requires = "viewer")]
    pub admin: bool,

    /// Viewer manages trainings
    #[arg(long, requires = "viewer")]
    pub training_manager: bool,

    /// Write the CSV here instead of stdout. A directory receives the
    /// suggested file name.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ExportArgs {
    pub fn window(&self) -> Result<Option<ExportWindow>> {
        match (self.month, self.year, self.from, self.to) {
            (Some(month), Some(year), None, None) => Ok(Some(ExportWindow::month(year, month)?)),
            (None, None, Some(from), Some(to)) => {
                if from > to {
                    bail!("--from {from} is after --to {to}");
                }
                Ok(Some(ExportWindow::range(from, to)))
            }
            (None, None, None, None) => Ok(None),
            _ => bail!("Use either --month/--year or --from/--to"),
        }
    }

    pub fn viewer(&self) -> Option<Viewer> {
        self.viewer.as_ref().map(|user_id| Viewer {
            user_id: user_id.clone(),
            is_admin: self.admin,
            is_training_manager: self.training_manager,
        })
    }
}

#[derive(Subcommand, Debug)]
pub enum NotifyCommand {
    /// Send one notification
    Send {
        /// Recipient user id
        #[arg(long)]
        to: String,
        #[arg(long = "type", default_value = "info")]
        kind: String,
        message: String,
    },

    /// Send the same notification to several recipients
    FanOut {
        /// Recipient user ids (repeat or comma-separate)
        #[arg(long, value_delimiter = ',', required = true)]
        to: Vec<String>,
        #[arg(long = "type", default_value = "info")]
        kind: String,
        message: String,
    },

    /// Mark one notification read
    MarkRead {
        /// Acting user; only their own notifications are touched
        #[arg(long)]
        user: String,
        id: String,
    },

    /// Mark every notification of a user read
    MarkAllRead {
        #[arg(long)]
        user: String,
    },

    /// Print the unread count of a user
    Unread {
        #[arg(long)]
        user: String,
    },

    /// List a user's notifications, newest first
    List {
        #[arg(long)]
        user: String,
        #[arg(long)]
        limit: Option<usize>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}
