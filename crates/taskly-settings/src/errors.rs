//! Settings error types.

use std::path::PathBuf;

use thiserror::Error;

/// Why settings could not be produced.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file exists but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The settings file is not JSON.
    #[error("{} is not valid JSON: {source}", path.display())]
    Parse {
        /// File that was parsed.
        path: PathBuf,
        /// Parser failure.
        source: serde_json::Error,
    },

    /// The merged document does not fit the settings types.
    #[error("settings have the wrong shape: {0}")]
    Shape(#[from] serde_json::Error),

    /// A value parsed but cannot be used.
    #[error("invalid {key}: {reason}")]
    Invalid {
        /// JSON path of the offending value.
        key: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_names_the_file() {
        let err = SettingsError::Read {
            path: PathBuf::from("/etc/taskly.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "cannot read /etc/taskly.json: denied");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn invalid_names_the_key() {
        let err = SettingsError::Invalid {
            key: "server.baseUrl",
            reason: "must start with http:// or https://".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid server.baseUrl: must start with http:// or https://"
        );
    }
}
