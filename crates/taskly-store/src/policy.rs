//! Per-operation failure policy.
//!
//! Store operations fall into two groups:
//!
//! | Operation          | Policy  | Caller sees                         |
//! |--------------------|---------|-------------------------------------|
//! | fetch              | Swallow | [`Outcome`], list left unchanged    |
//! | create             | Raise   | `Err(StoreError)`                   |
//! | update status      | Swallow | [`Outcome`], list left unchanged    |
//! | update             | Raise   | `Err(StoreError)`                   |
//! | delete             | Swallow | [`Outcome`], list left unchanged    |
//!
//! Both groups log the failure at `error` level. Swallowed failures are
//! still handed back inside [`Outcome::Unchanged`] so a caller that does
//! care can look, but ignoring them is the expected use.

use std::fmt;

use tracing::error;

use crate::errors::StoreError;

/// How an operation reports failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Log and leave state unchanged.
    Swallow,
    /// Log and return the error.
    Raise,
}

/// Store operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreOperation {
    /// Replace the list from the server.
    Fetch,
    /// Create and append.
    Create,
    /// Change status and replace in place.
    UpdateStatus,
    /// Change fields and replace in place.
    Update,
    /// Delete and remove.
    Delete,
}

impl StoreOperation {
    /// The failure policy for this operation.
    #[must_use]
    pub const fn policy(self) -> ErrorPolicy {
        match self {
            Self::Fetch | Self::UpdateStatus | Self::Delete => ErrorPolicy::Swallow,
            Self::Create | Self::Update => ErrorPolicy::Raise,
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Fetch => "fetch_tasks",
            Self::Create => "create_task",
            Self::UpdateStatus => "update_task_status",
            Self::Update => "update_task",
            Self::Delete => "delete_task",
        }
    }
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of an operation whose failures are swallowed.
#[must_use]
#[derive(Debug)]
pub enum Outcome<T> {
    /// The server accepted the change and the local list reflects it.
    Applied(T),
    /// The operation failed (already logged); the local list is as before.
    Unchanged(StoreError),
}

impl<T> Outcome<T> {
    /// Whether the change was applied.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// The applied value, if any.
    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(v) => Some(v),
            Self::Unchanged(_) => None,
        }
    }

    /// The swallowed error, if any.
    pub fn error(&self) -> Option<&StoreError> {
        match self {
            Self::Applied(_) => None,
            Self::Unchanged(e) => Some(e),
        }
    }

    /// Convert back into a `Result` for callers that want to propagate.
    pub fn into_result(self) -> Result<T, StoreError> {
        match self {
            Self::Applied(v) => Ok(v),
            Self::Unchanged(e) => Err(e),
        }
    }
}

/// Settle a swallowing operation: log a failure and wrap it.
pub(crate) fn swallow<T>(op: StoreOperation, result: Result<T, StoreError>) -> Outcome<T> {
    debug_assert_eq!(op.policy(), ErrorPolicy::Swallow);
    match result {
        Ok(v) => Outcome::Applied(v),
        Err(e) => {
            log_failure(op, &e);
            Outcome::Unchanged(e)
        }
    }
}

/// Settle a raising operation: log a failure and pass it on.
pub(crate) fn raise<T>(op: StoreOperation, result: Result<T, StoreError>) -> Result<T, StoreError> {
    debug_assert_eq!(op.policy(), ErrorPolicy::Raise);
    if let Err(e) = &result {
        log_failure(op, e);
    }
    result
}

fn log_failure(op: StoreOperation, e: &StoreError) {
    match e.status() {
        Some(status) => error!(operation = %op, status, error = %e, "task store operation failed"),
        None => error!(operation = %op, error = %e, "task store operation failed"),
    }
}
