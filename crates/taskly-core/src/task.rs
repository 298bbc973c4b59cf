//! Task model: the in-memory [`Task`] and the wire-format [`TaskRow`].
//!
//! The server transmits rows with `due_date` as a string. A row is
//! translated into a [`Task`] at the client boundary and never held past
//! that step:
//!
//! - RFC 3339 timestamps parse as-is (normalised to UTC).
//! - Bare `YYYY-MM-DD` dates become midnight UTC.
//! - `null` means "no deadline".
//!
//! Legacy rows (numeric `id`, `photo_url` instead of `photo`, missing
//! `status`) decode into the same canonical shape.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::TaskError;
use crate::ids::TaskId;

/// Wire format for date-only due dates.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

// ─────────────────────────────────────────────────────────────────────────────
// TaskStatus
// ─────────────────────────────────────────────────────────────────────────────

/// Workflow status of a task.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started.
    #[default]
    Todo,
    /// Being worked on.
    InProgress,
    /// Finished.
    Done,
}

impl TaskStatus {
    /// Every status, in workflow order.
    pub const ALL: [Self; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// Wire representation (`TODO`, `IN_PROGRESS`, `DONE`).
    #[must_use]
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown task status {0:?} (expected TODO, IN_PROGRESS or DONE)")]
pub struct UnknownStatus(pub String);

impl FromStr for TaskStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_wire() == s)
            .ok_or_else(|| UnknownStatus(s.to_owned()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TaskRow (wire)
// ─────────────────────────────────────────────────────────────────────────────

/// A task as transmitted by the server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskRow {
    /// Server-assigned identifier.
    pub id: TaskId,
    /// Display title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// ISO-8601 date or timestamp, `None` for no deadline.
    #[serde(default)]
    pub due_date: Option<String>,
    /// Workflow status. Older server revisions omit it.
    #[serde(default)]
    pub status: Option<TaskStatus>,
    /// Server-relative photo path.
    #[serde(default, alias = "photo_url")]
    pub photo: Option<String>,
}

impl TaskRow {
    /// Translate the row into a [`Task`], parsing the due date.
    pub fn into_task(self) -> Result<Task, TaskError> {
        let due_date = self.due_date.as_deref().map(parse_due_date).transpose()?;
        Ok(Task {
            id: self.id,
            title: self.title,
            description: self.description,
            due_date,
            status: self.status.unwrap_or_default(),
            photo: self.photo.filter(|p| !p.is_empty()),
        })
    }
}

impl TryFrom<TaskRow> for Task {
    type Error = TaskError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        row.into_task()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Task (client)
// ─────────────────────────────────────────────────────────────────────────────

/// A task as held by the client.
#[derive(Clone, Debug, PartialEq)]
pub struct Task {
    /// Server-assigned identifier, unique within a store.
    pub id: TaskId,
    /// Display title.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Deadline, `None` for no deadline.
    pub due_date: Option<DateTime<Utc>>,
    /// Workflow status.
    pub status: TaskStatus,
    /// Server-relative photo path.
    pub photo: Option<String>,
}

impl Task {
    /// Calendar day of the deadline, in UTC.
    #[must_use]
    pub fn due_day(&self) -> Option<NaiveDate> {
        self.due_date.map(|d| d.date_naive())
    }

    /// Whether the deadline falls strictly before `today`.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != TaskStatus::Done && self.due_day().is_some_and(|d| d < today)
    }

    /// Translate back into the wire shape.
    #[must_use]
    pub fn to_row(&self) -> TaskRow {
        TaskRow {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: self.due_date.map(format_due_date),
            status: Some(self.status),
            photo: self.photo.clone(),
        }
    }
}

/// Parse a wire due date.
pub fn parse_due_date(value: &str) -> Result<DateTime<Utc>, TaskError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, DUE_DATE_FORMAT)
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| TaskError::InvalidDueDate {
            value: value.to_owned(),
        })
}

/// Format a due date for the wire: date-only at midnight, RFC 3339 otherwise.
#[must_use]
pub fn format_due_date(value: DateTime<Utc>) -> String {
    if value.time() == NaiveTime::MIN {
        value.format(DUE_DATE_FORMAT).to_string()
    } else {
        value.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
