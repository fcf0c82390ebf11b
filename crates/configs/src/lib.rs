//! # configs
//!
//! Layered runtime settings: built-in defaults, then an optional `forum.toml`,
//! then `FORUM__*` environment variables (optionally fed from a `.env` file).
//!
//! ```text
//! FORUM__LOG__FILTER=debug
//! FORUM__LOG__FORMAT=json
//! FORUM__SERVICE__THREAD_TIME_SHIFT_HOURS=3
//! ```

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;

/// Base name of the optional settings file, looked up in the working directory.
pub const DEFAULT_FILE: &str = "forum";
const ENV_PREFIX: &str = "FORUM";

/// Exports the variables of `.env` in the working directory into the process
/// environment. Returns the file that was read, if any.
pub fn load_dotenv() -> Option<PathBuf> {
    let dir = std::env::current_dir().ok()?;
    load_dotenv_from(&dir)
}

pub fn load_dotenv_from(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(".env");
    dotenvy::from_path(&path).ok().map(|()| path)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Hours subtracted from a thread's creation time in detailed post views.
    /// Only for clients that expect the legacy offset; keep at 0 otherwise.
    pub thread_time_shift_hours: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SeedSettings {
    /// Populate the store with a demo forum at startup
    pub enabled: bool,
}

impl Default for SeedSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log: LogSettings,
    pub service: ServiceSettings,
    pub seed: SeedSettings,
}

impl Settings {
    /// Reads `forum.toml` (if any), then the environment. Call
    /// [`load_dotenv`] first for `.env` values to be seen.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_FILE)
    }

    /// Same layering as [`Settings::load`] with an explicit file base name.
    pub fn load_from(file: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(file).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
