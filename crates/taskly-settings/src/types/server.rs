//! Server and upload settings.

use serde::{Deserialize, Serialize};

/// Remote API settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Origin every request path is resolved against.
    pub base_url: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
        }
    }
}

/// Photo upload settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadSettings {
    /// File name used when a downloaded photo's URL carries none.
    pub fallback_file_name: String,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            fallback_file_name: "image.jpg".to_string(),
        }
    }
}
