//! Task identifier newtype.
//!
//! Task IDs are assigned by the server. Older server revisions emit them as
//! JSON numbers, newer ones as strings; both decode into the same
//! string-backed [`TaskId`] so the rest of the client never sees the
//! difference.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned task identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Return the inner string as a slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty (never valid on the wire).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::ops::Deref for TaskId {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<u64> for TaskId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

struct TaskIdVisitor;

impl Visitor<'_> for TaskIdVisitor {
    type Value = TaskId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a task id as a string or an integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<TaskId, E> {
        Ok(TaskId::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<TaskId, E> {
        Ok(TaskId(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<TaskId, E> {
        Ok(TaskId::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<TaskId, E> {
        Ok(TaskId(v.to_string()))
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TaskIdVisitor)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_string_id() {
        let id: TaskId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn decodes_numeric_id() {
        let id: TaskId = serde_json::from_str("42").unwrap();
        assert_eq!(id, TaskId::from("42"));
    }

    #[test]
    fn rejects_non_scalar_id() {
        assert!(serde_json::from_str::<TaskId>("{\"id\": 1}").is_err());
        assert!(serde_json::from_str::<TaskId>("1.5").is_err());
    }

    #[test]
    fn serializes_as_string() {
        let id = TaskId::from(7_u64);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7\"");
    }

    #[test]
    fn display_and_deref() {
        let id = TaskId::from("abc");
        assert_eq!(id.to_string(), "abc");
        assert_eq!(id.len(), 3);
        assert!(!id.is_empty());
        assert!(TaskId::from("").is_empty());
    }
}
