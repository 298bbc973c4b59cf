//! # taskly
//!
//! Command-line client for a Taskly task server. Settings come from
//! `~/.taskly/settings.json` and `TASKLY_*` variables; the global flags
//! override both.

#![deny(unsafe_code)]

mod cli;
mod commands;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use taskly_core::logging::init_subscriber;
use taskly_settings::{TasklySettings, load_settings, load_settings_from_path};
use tracing::debug;

use crate::cli::Cli;
use crate::commands::App;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = resolve_settings(&cli)?;
    init_subscriber(&settings.logging.level);
    debug!(server = %settings.server.base_url, "settings loaded");

    let app = App::new(settings, cli.color())?;
    let output = app.run(cli.command).await?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

/// Load the settings file, then apply command-line overrides.
fn resolve_settings(cli: &Cli) -> Result<TasklySettings> {
    let mut settings = match &cli.settings {
        Some(path) => load_settings_from_path(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => load_settings().context("Failed to load settings")?,
    };
    if let Some(server) = &cli.server {
        settings.server.base_url.clone_from(server);
    }
    if let Some(level) = &cli.log_level {
        settings.logging.level.clone_from(level);
    }
    settings
        .validate()
        .context("Invalid command-line override")?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"server": {"baseUrl": "http://file.example"}, "logging": {"level": "info"}}"#,
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "taskly",
            "--settings",
            path.to_str().unwrap(),
            "--server",
            "http://flag.example:9000",
            "list",
        ])
        .unwrap();
        let settings = resolve_settings(&cli).unwrap();
        assert_eq!(settings.server.base_url, "http://flag.example:9000");
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn rejects_non_http_server_flag() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "taskly",
            "--settings",
            dir.path().join("missing.json").to_str().unwrap(),
            "--server",
            "ftp://nope",
            "list",
        ])
        .unwrap();
        assert!(resolve_settings(&cli).is_err());
    }
}
