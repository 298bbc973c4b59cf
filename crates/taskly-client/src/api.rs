//! The remote task API.
//!
//! | Operation     | Method | Path               | Body                 |
//! |---------------|--------|--------------------|----------------------|
//! | list          | GET    | `/api/tasks/`      | none                 |
//! | create        | POST   | `/api/tasks/`      | multipart task form  |
//! | update status | PATCH  | `/api/tasks/{id}/` | multipart `status`   |
//! | update        | PUT    | `/api/tasks/{id}/` | multipart task form  |
//! | delete        | DELETE | `/api/tasks/{id}/` | JSON `{"id": …}`     |
//!
//! Implementations return wire rows untouched; translating them into
//! [`Task`](taskly_core::Task) values is the caller's job.

use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Method;
use taskly_core::{TaskForm, TaskId, TaskRow};

use crate::errors::ClientError;
use crate::form::{StatusUpdate, to_multipart};
use crate::http::{HttpResponse, RequestOptions, ServerClient};

/// Collection path.
pub const TASKS_PATH: &str = "/api/tasks/";

/// Bytes escaped in a path segment: all but RFC 3986 unreserved characters.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Path of a single task. The id always stays one path segment.
///
/// # Errors
///
/// [`ClientError::InvalidTaskId`] for `""`, `.` and `..`.
pub fn task_path(id: &TaskId) -> Result<String, ClientError> {
    if matches!(id.as_str(), "" | "." | "..") {
        return Err(ClientError::InvalidTaskId(id.to_string()));
    }
    Ok(format!("{TASKS_PATH}{}/", utf8_percent_encode(id.as_str(), SEGMENT)))
}

/// Operations the task server offers.
///
/// Non-success statuses surface as [`ClientError::Status`].
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Fetch every task.
    async fn list_tasks(&self) -> Result<Vec<TaskRow>, ClientError>;

    /// Create a task.
    async fn create_task(&self, form: &TaskForm) -> Result<TaskRow, ClientError>;

    /// Change only the status of a task.
    async fn update_task_status(
        &self,
        id: &TaskId,
        update: StatusUpdate,
    ) -> Result<TaskRow, ClientError>;

    /// Replace a task's fields.
    async fn update_task(&self, id: &TaskId, form: &TaskForm) -> Result<TaskRow, ClientError>;

    /// Delete a task. The response body is ignored.
    async fn delete_task(&self, id: &TaskId) -> Result<(), ClientError>;
}

/// [`TaskApi`] over HTTP.
#[derive(Clone, Debug)]
pub struct HttpTaskApi {
    client: ServerClient,
}

impl HttpTaskApi {
    /// Wrap a server client.
    #[must_use]
    pub fn new(client: ServerClient) -> Self {
        Self { client }
    }

    /// The underlying server client.
    #[must_use]
    pub fn client(&self) -> &ServerClient {
        &self.client
    }

    async fn send(&self, path: &str, options: RequestOptions) -> Result<HttpResponse, ClientError> {
        self.client.fetch_server(path, options).await?.error_for_status()
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn list_tasks(&self) -> Result<Vec<TaskRow>, ClientError> {
        self.send(TASKS_PATH, RequestOptions::method(Method::GET))
            .await?
            .json()
    }

    async fn create_task(&self, form: &TaskForm) -> Result<TaskRow, ClientError> {
        let options = RequestOptions::method(Method::POST).multipart(to_multipart(form)?);
        self.send(TASKS_PATH, options).await?.json()
    }

    async fn update_task_status(
        &self,
        id: &TaskId,
        update: StatusUpdate,
    ) -> Result<TaskRow, ClientError> {
        let options = RequestOptions::method(Method::PATCH).multipart(update.to_multipart());
        self.send(&task_path(id)?, options).await?.json()
    }

    async fn update_task(&self, id: &TaskId, form: &TaskForm) -> Result<TaskRow, ClientError> {
        let options = RequestOptions::method(Method::PUT).multipart(to_multipart(form)?);
        self.send(&task_path(id)?, options).await?.json()
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), ClientError> {
        let options =
            RequestOptions::method(Method::DELETE).json(serde_json::json!({ "id": id }));
        let _ = self.send(&task_path(id)?, options).await?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
