//! Display colour per task status.

use crate::task::TaskStatus;

/// Fixed display colour for a status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusColor {
    /// `TODO`.
    Blue,
    /// `IN_PROGRESS`.
    Yellow,
    /// `DONE`.
    Green,
    /// Absent or unrecognised status.
    Gray,
}

impl StatusColor {
    /// CSS utility class used by the web front end.
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Blue => "text-blue-400",
            Self::Yellow => "text-yellow-400",
            Self::Green => "text-green-400",
            Self::Gray => "text-gray-400",
        }
    }

    /// ANSI SGR foreground code for terminal output.
    #[must_use]
    pub fn ansi_code(self) -> u8 {
        match self {
            Self::Blue => 34,
            Self::Yellow => 33,
            Self::Green => 32,
            Self::Gray => 90,
        }
    }
}

impl From<TaskStatus> for StatusColor {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Todo => Self::Blue,
            TaskStatus::InProgress => Self::Yellow,
            TaskStatus::Done => Self::Green,
        }
    }
}

/// Map a raw status string to its colour. Total: anything unknown is gray.
#[must_use]
pub fn task_status_color(status: Option<&str>) -> StatusColor {
    status
        .and_then(|s| s.parse::<TaskStatus>().ok())
        .map_or(StatusColor::Gray, StatusColor::from)
}
