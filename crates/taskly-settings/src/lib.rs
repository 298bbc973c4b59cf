//! # taskly-settings
//!
//! Configuration for the Taskly client, loaded from three layers (in
//! priority order):
//! 1. **Compiled defaults** — [`TasklySettings::default()`]
//! 2. **User file** — `~/.taskly/settings.json` (deep-merged over defaults)
//! 3. **Environment variables** — `TASKLY_*` overrides (highest priority)
//!
//! Settings are loaded once by the binary and passed down explicitly;
//! there is no global instance.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        let settings = TasklySettings::default();
        assert_eq!(settings.server.base_url, "http://localhost:8000");
        assert_eq!(settings.logging.level, "warn");
        assert_eq!(settings.upload.fallback_file_name, "image.jpg");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn settings_path_is_under_home() {
        let path = settings_path();
        assert!(path.ends_with(".taskly/settings.json"));
    }
}
