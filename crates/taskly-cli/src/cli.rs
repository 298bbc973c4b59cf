//! Command-line arguments.

use std::io::IsTerminal;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use taskly_core::TaskStatus;
use taskly_core::task::UnknownStatus;

/// Command-line client for a Taskly task server.
#[derive(Parser, Debug)]
#[command(name = "taskly", version, about = "Command-line client for a Taskly task server")]
pub struct Cli {
    /// Server base URL (overrides settings and `TASKLY_SERVER`).
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Log filter, e.g. `debug` or `taskly_store=trace`. `RUST_LOG` wins.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Settings file to read instead of `~/.taskly/settings.json`.
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Print statuses without colour.
    #[arg(long, global = true, default_value_t = false)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Whether status badges should be coloured.
    pub fn color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List tasks in server order.
    List {
        /// Only tasks with this status.
        #[arg(long, value_parser = parse_status)]
        status: Option<TaskStatus>,
    },
    /// Show one task in full.
    Show {
        /// Task id.
        id: String,
    },
    /// Create a task.
    Create(CreateArgs),
    /// Change a task's fields. Unset flags keep the current value.
    Edit(EditArgs),
    /// Change only a task's status.
    Status {
        /// Task id.
        id: String,
        /// New status: todo, in-progress or done.
        #[arg(value_parser = parse_status)]
        status: TaskStatus,
    },
    /// Delete a task.
    Delete {
        /// Task id.
        id: String,
    },
    /// Download a task's photo.
    Photo {
        /// Task id.
        id: String,
        /// Where to write it. Defaults to the photo's file name.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Task title.
    pub title: String,

    /// Longer description.
    #[arg(long, short, default_value = "")]
    pub description: String,

    /// Due date (YYYY-MM-DD).
    #[arg(long)]
    pub due: Option<NaiveDate>,

    /// Initial status.
    #[arg(long, value_parser = parse_status, default_value = "todo")]
    pub status: TaskStatus,

    /// Image to attach.
    #[arg(long)]
    pub photo: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Task id.
    pub id: String,

    /// New title.
    #[arg(long)]
    pub title: Option<String>,

    /// New description.
    #[arg(long, short)]
    pub description: Option<String>,

    /// New due date (YYYY-MM-DD).
    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<NaiveDate>,

    /// Remove the due date.
    #[arg(long, default_value_t = false)]
    pub clear_due: bool,

    /// New status.
    #[arg(long, value_parser = parse_status)]
    pub status: Option<TaskStatus>,

    /// Replacement image. Without it the current photo is re-uploaded.
    #[arg(long)]
    pub photo: Option<PathBuf>,
}

/// Accepts wire names and friendlier spellings (`todo`, `in-progress`).
fn parse_status(value: &str) -> Result<TaskStatus, UnknownStatus> {
    value.trim().to_ascii_uppercase().replace(['-', ' '], "_").parse()
}
