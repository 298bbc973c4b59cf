//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` on the JSON side and
//! `#[serde(default)]`, so a partial settings file only overrides what it
//! names.

mod server;

pub use server::*;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Root settings type.
///
/// # JSON Format
///
/// ```json
/// {
///   "server": { "baseUrl": "https://tasks.example.com" },
///   "logging": { "level": "info" }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TasklySettings {
    /// Remote API location.
    pub server: ServerSettings,
    /// Log output.
    pub logging: LoggingSettings,
    /// Photo upload behaviour.
    pub upload: UploadSettings,
}

impl TasklySettings {
    /// Reject values the client cannot work with.
    pub fn validate(&self) -> Result<()> {
        let url = self.server.base_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(SettingsError::Invalid {
                key: "server.baseUrl",
                reason: format!("must start with http:// or https://, got {url:?}"),
            });
        }
        if self.upload.fallback_file_name.trim().is_empty() {
            return Err(SettingsError::Invalid {
                key: "upload.fallbackFileName",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Logging configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}
