//! Client error types.

use thiserror::Error;

/// Errors from talking to the task API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (connect, TLS, body read).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The response body was not the expected JSON shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A task id that cannot address a resource (`""`, `.` or `..`).
    #[error("task id {0:?} cannot be used in a request path")]
    InvalidTaskId(String),

    /// A multipart part could not be built.
    #[error("invalid upload: {0}")]
    Upload(String),
}

impl ClientError {
    /// HTTP status for [`ClientError::Status`], `None` otherwise.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure happened before any response existed.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
