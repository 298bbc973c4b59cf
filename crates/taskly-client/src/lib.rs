//! # taskly-client
//!
//! Thin HTTP plumbing for the remote task API:
//!
//! - [`endpoint`]: joins the configured server origin with a request path
//! - [`http`]: [`ServerClient`], which sends every request with a fixed
//!   credential policy that callers may override per request
//! - [`api`]: the [`TaskApi`] trait and its HTTP implementation
//! - [`form`]: multipart rendering of task submissions
//! - [`files`]: downloading a URL into an uploadable [`FileUpload`](taskly_core::FileUpload)
//!
//! Every call is a single attempt: no retry, no timeout beyond the
//! transport's own.

#![deny(unsafe_code)]

pub mod api;
pub mod endpoint;
pub mod errors;
pub mod files;
pub mod form;
pub mod http;

pub use api::{HttpTaskApi, TaskApi};
pub use endpoint::resolve_endpoint;
pub use errors::ClientError;
pub use files::{DEFAULT_FILE_NAME, url_to_file};
pub use form::StatusUpdate;
pub use http::{Credentials, HttpResponse, RequestBody, RequestOptions, ServerClient};
