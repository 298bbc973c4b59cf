//! # taskly-store
//!
//! The session's task list, kept consistent with the server after every
//! mutation. See [`TaskStore`] for the operations and [`policy`] for how
//! each one reports failure.

#![deny(unsafe_code)]

pub mod errors;
pub mod policy;
pub mod store;

pub use errors::StoreError;
pub use policy::{ErrorPolicy, Outcome, StoreOperation};
pub use store::TaskStore;
