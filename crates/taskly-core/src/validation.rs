//! Client-side validation for task submissions.
//!
//! A [`TaskForm`] holds the values a user is about to submit. [`TaskForm::validate`]
//! checks every rule and reports all violations at once, so a form can mark
//! each offending field in a single pass.
//!
//! Rules:
//! - `title`: 2..=100 characters after trimming
//! - `description`: at most 200 characters
//! - `due_date`: not before today, unless an edit leaves it unchanged
//! - `photo`: at most [`MAX_PHOTO_BYTES`], one of [`ACCEPTED_PHOTO_TYPES`]

use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

use crate::task::{Task, TaskStatus};
use crate::upload::FileUpload;

/// Minimum title length in characters.
pub const TITLE_MIN_CHARS: usize = 2;
/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 100;
/// Maximum description length in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 200;
/// Maximum photo size (5 MiB).
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;
/// MIME types accepted for photos.
pub const ACCEPTED_PHOTO_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Whether a MIME type names an accepted photo format.
///
/// Only the essence is compared: parameters after `;` and ASCII case are
/// ignored.
#[must_use]
pub fn is_accepted_photo_type(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    ACCEPTED_PHOTO_TYPES
        .iter()
        .any(|accepted| accepted.eq_ignore_ascii_case(essence))
}

/// Form values for creating or editing a task.
#[derive(Clone, Debug, PartialEq)]
pub struct TaskForm {
    /// Task title.
    pub title: String,
    /// Task description, may be empty.
    pub description: String,
    /// Optional deadline.
    pub due_date: Option<NaiveDate>,
    /// Workflow status.
    pub status: TaskStatus,
    /// Photo to upload alongside the task.
    pub photo: Option<FileUpload>,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            title: "New Task".to_string(),
            description: String::new(),
            due_date: None,
            status: TaskStatus::Todo,
            photo: None,
        }
    }
}

impl TaskForm {
    /// Prefill a form from an existing task. The photo is not carried: it
    /// lives on the server and must be fetched to be re-submitted.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            due_date: task.due_day(),
            status: task.status,
            photo: None,
        }
    }

    /// Check every rule against `today`.
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationErrors> {
        self.check(today, None)
    }

    /// Check an edit of a task whose deadline is `current_due`.
    ///
    /// A due date equal to `current_due` is exempt from the past-date rule,
    /// so an overdue task can still be renamed without moving its deadline.
    pub fn validate_edit(
        &self,
        today: NaiveDate,
        current_due: Option<NaiveDate>,
    ) -> Result<(), ValidationErrors> {
        self.check(today, current_due)
    }

    fn check(&self, today: NaiveDate, kept_due: Option<NaiveDate>) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        let title_len = self.title.trim().chars().count();
        if title_len < TITLE_MIN_CHARS {
            errors.push(FieldError::new(
                "title",
                format!("must be at least {TITLE_MIN_CHARS} characters"),
            ));
        } else if title_len > TITLE_MAX_CHARS {
            errors.push(FieldError::new(
                "title",
                format!("must be at most {TITLE_MAX_CHARS} characters"),
            ));
        }

        if self.description.chars().count() > DESCRIPTION_MAX_CHARS {
            errors.push(FieldError::new(
                "description",
                format!("must be at most {DESCRIPTION_MAX_CHARS} characters"),
            ));
        }

        if let Some(due) = self.due_date {
            if due < today && kept_due != Some(due) {
                errors.push(FieldError::new("due_date", "must not be in the past"));
            }
        }

        if let Some(photo) = &self.photo {
            if photo.len() > MAX_PHOTO_BYTES {
                errors.push(FieldError::new(
                    "photo",
                    format!("must be at most {} MiB", MAX_PHOTO_BYTES / (1024 * 1024)),
                ));
            }
            if !is_accepted_photo_type(&photo.content_type) {
                errors.push(FieldError::new(
                    "photo",
                    format!("unsupported type {:?}", photo.content_type),
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors { errors })
        }
    }
}

/// One rule violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    /// Field name as submitted.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every violation found in a form.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid task form: {}", summarize(.errors))]
pub struct ValidationErrors {
    /// Violations in rule order.
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Violations for one field.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldError> {
        self.errors.iter().filter(move |e| e.field == field)
    }

    /// Whether a field has at least one violation.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.for_field(field).next().is_some()
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
