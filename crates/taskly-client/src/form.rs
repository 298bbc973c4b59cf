//! Multipart rendering of task submissions.

use reqwest::multipart::{Form, Part};
use taskly_core::task::DUE_DATE_FORMAT;
use taskly_core::{FileUpload, TaskForm, TaskStatus};

use crate::errors::ClientError;

/// Status-only change sent by a partial update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusUpdate {
    /// New status.
    pub status: TaskStatus,
}

impl StatusUpdate {
    /// Render as a multipart form carrying only `status`.
    #[must_use]
    pub fn to_multipart(self) -> Form {
        Form::new().text("status", self.status.as_wire())
    }
}

/// Text fields of a task submission, in submission order.
#[must_use]
pub fn text_fields(form: &TaskForm) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("title", form.title.trim().to_string()),
        ("description", form.description.clone()),
        ("status", form.status.as_wire().to_string()),
    ];
    if let Some(due) = form.due_date {
        fields.push(("due_date", due.format(DUE_DATE_FORMAT).to_string()));
    }
    fields
}

/// Render a task submission as a multipart form.
pub fn to_multipart(form: &TaskForm) -> Result<Form, ClientError> {
    let mut multipart = text_fields(form)
        .into_iter()
        .fold(Form::new(), |acc, (name, value)| acc.text(name, value));
    if let Some(photo) = &form.photo {
        multipart = multipart.part("photo", photo_part(photo)?);
    }
    Ok(multipart)
}

fn photo_part(photo: &FileUpload) -> Result<Part, ClientError> {
    let part = Part::bytes(photo.bytes.to_vec()).file_name(photo.file_name.clone());
    if photo.content_type.is_empty() {
        return Ok(part);
    }
    part.mime_str(&photo.content_type)
        .map_err(|e| ClientError::Upload(format!("bad content type {:?}: {e}", photo.content_type)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn text_fields_include_due_date_when_present() {
        let form = TaskForm {
            title: "  Plan trip ".into(),
            description: "Book flights".into(),
            due_date: NaiveDate::from_ymd_opt(2025, 3, 9),
            status: TaskStatus::InProgress,
            photo: None,
        };
        let fields = text_fields(&form);
        assert_eq!(
            fields,
            vec![
                ("title", "Plan trip".to_string()),
                ("description", "Book flights".to_string()),
                ("status", "IN_PROGRESS".to_string()),
                ("due_date", "2025-03-09".to_string()),
            ]
        );
    }

    #[test]
    fn text_fields_omit_missing_due_date() {
        let fields = text_fields(&TaskForm::default());
        assert!(fields.iter().all(|(name, _)| *name != "due_date"));
    }

    #[test]
    fn renders_with_photo() {
        let form = TaskForm {
            photo: Some(FileUpload::new("p.png", "image/png", vec![1_u8, 2])),
            ..TaskForm::default()
        };
        assert!(to_multipart(&form).is_ok());
    }

    #[test]
    fn rejects_malformed_content_type() {
        let form = TaskForm {
            photo: Some(FileUpload::new("p.png", "not a mime", vec![1_u8])),
            ..TaskForm::default()
        };
        assert!(matches!(to_multipart(&form), Err(ClientError::Upload(_))));
    }
}
