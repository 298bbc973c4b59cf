//! # taskly-core
//!
//! Foundation types for the Taskly client.
//!
//! - [`task`]: the canonical [`Task`](task::Task) and its wire row
//! - [`ids`]: the [`TaskId`](ids::TaskId) newtype
//! - [`validation`]: client-side form rules applied before submission
//! - [`status_color`]: display colour per task status
//! - [`upload`]: in-memory file payloads for photo uploads
//! - [`errors`]: decode errors for wire rows
//! - [`logging`]: tracing subscriber bootstrap and test capture

#![deny(unsafe_code)]

pub mod errors;
pub mod ids;
pub mod logging;
pub mod status_color;
pub mod task;
pub mod upload;
pub mod validation;

pub use errors::TaskError;
pub use ids::TaskId;
pub use status_color::{StatusColor, task_status_color};
pub use task::{Task, TaskRow, TaskStatus};
pub use upload::FileUpload;
pub use validation::{TaskForm, ValidationErrors, is_accepted_photo_type};
