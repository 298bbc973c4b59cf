//! Structured logging with `tracing`.
//!
//! - [`init_subscriber`] installs the global stderr subscriber once at startup
//! - [`capture_logs`] installs a thread-local in-memory subscriber for tests
//!
//! Library crates only emit events; installing a subscriber is left to the
//! binary.

pub mod test_utils;

pub use test_utils::{CapturedEvent, CapturedLogs, capture_logs};

/// Default filter when neither settings nor `RUST_LOG` specify one.
pub const DEFAULT_LEVEL: &str = "warn";

/// Initialize the global tracing subscriber with stderr output.
///
/// `RUST_LOG` takes precedence over `level`. Subsequent calls are no-ops.
pub fn init_subscriber(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    // try_init fails if a global subscriber is already set
    let _ = subscriber.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_subscriber_is_idempotent() {
        init_subscriber("debug");
        init_subscriber("info");
        tracing::info!("after init");
    }

    #[test]
    fn init_subscriber_tolerates_bad_filter() {
        init_subscriber("not a [valid filter");
    }
}
