//! Task model error types.

use thiserror::Error;

/// Errors raised while translating wire rows into tasks.
#[derive(Debug, Error)]
pub enum TaskError {
    /// A `due_date` string was neither RFC 3339 nor `YYYY-MM-DD`.
    #[error("invalid due date {value:?}")]
    InvalidDueDate {
        /// The offending wire value.
        value: String,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_due_date_display() {
        let err = TaskError::InvalidDueDate {
            value: "tomorrow".into(),
        };
        assert_eq!(err.to_string(), "invalid due date \"tomorrow\"");
    }
}
