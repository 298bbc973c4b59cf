//! Store error types.

use taskly_client::ClientError;
use taskly_core::{TaskError, TaskId};
use thiserror::Error;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The request failed or the server rejected it.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A returned row could not be translated into a task.
    #[error(transparent)]
    Task(#[from] TaskError),

    /// The server accepted a change to a task the local list no longer holds.
    #[error("task {id} not found in the local list")]
    NotFound {
        /// The task that was targeted.
        id: TaskId,
    },

    /// An update was requested without a task ID.
    #[error("task id is required")]
    MissingTaskId,
}

impl StoreError {
    /// HTTP status when the server rejected the request.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Client(e) => e.status(),
            _ => None,
        }
    }
}
