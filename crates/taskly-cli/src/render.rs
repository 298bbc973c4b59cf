//! Plain-text rendering of tasks for the terminal.

use std::fmt::Write as _;

use chrono::NaiveDate;
use taskly_core::{StatusColor, Task, TaskStatus};

const STATUS_WIDTH: usize = 11;

/// Status label, padded, optionally wrapped in its ANSI colour.
pub fn status_badge(status: TaskStatus, color: bool) -> String {
    let label = format!("{:<STATUS_WIDTH$}", status.label());
    if color {
        let code = StatusColor::from(status).ansi_code();
        format!("\x1b[{code}m{label}\x1b[0m")
    } else {
        label
    }
}

fn due_cell(task: &Task, today: NaiveDate) -> String {
    match task.due_day() {
        Some(day) if task.is_overdue(today) => format!("{day} (overdue)"),
        Some(day) => day.to_string(),
        None => "-".to_owned(),
    }
}

/// One summary line.
pub fn task_line(task: &Task, today: NaiveDate, color: bool) -> String {
    format!(
        "{:>5}  {}  {:<23}  {}",
        task.id.as_str(),
        status_badge(task.status, color),
        due_cell(task, today),
        task.title
    )
}

/// Header plus one line per task.
pub fn task_table(tasks: &[Task], today: NaiveDate, color: bool) -> String {
    if tasks.is_empty() {
        return "No tasks.".to_owned();
    }
    let mut out = format!(
        "{:>5}  {:<STATUS_WIDTH$}  {:<23}  {}",
        "ID", "STATUS", "DUE", "TITLE"
    );
    for task in tasks {
        out.push('\n');
        out.push_str(&task_line(task, today, color));
    }
    out
}

/// Every field of one task. `photo_url` is the photo's absolute URL.
pub fn task_detail(task: &Task, photo_url: Option<&str>, today: NaiveDate, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Task {}", task.id);
    let _ = writeln!(out, "  Title:       {}", task.title);
    let _ = writeln!(out, "  Status:      {}", status_badge(task.status, color).trim_end());
    let _ = writeln!(out, "  Due:         {}", due_cell(task, today));
    let description = task.description.as_deref().filter(|d| !d.is_empty());
    let _ = writeln!(out, "  Description: {}", description.unwrap_or("-"));
    let _ = write!(out, "  Photo:       {}", photo_url.unwrap_or("-"));
    out
}
