//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the trivia server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TriviaConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Filesystem locations for mounts, dataset and extensions.
    pub paths: PathsConfig,

    /// Log output settings.
    pub logging: LoggingConfig,

    /// Restart-on-change settings.
    pub reload: ReloadConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8000".to_string(),
        }
    }
}

/// Where the server finds its files.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory served under `/assets`.
    pub assets: PathBuf,

    /// Directory served under `/bin`.
    pub bin: PathBuf,

    /// Trivia dataset (category → records).
    pub dataset: PathBuf,

    /// Directory scanned for extension manifests.
    pub extensions: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            assets: PathBuf::from("public/assets"),
            bin: PathBuf::from("public/bin"),
            dataset: PathBuf::from("public/bin/trivia_utf-8.json"),
            extensions: PathBuf::from("extensions"),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,

    /// Colour terminal output by level.
    pub color: bool,

    /// Also write to a daily rotating file.
    pub file: bool,

    /// Directory for log files.
    pub directory: String,

    /// Log file name prefix; the date follows it.
    pub file_prefix: String,

    /// Log file extension.
    pub extension: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            color: true,
            file: false,
            directory: "logs".to_string(),
            file_prefix: "trivia".to_string(),
            extension: "log".to_string(),
        }
    }
}

/// Restart-on-change settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReloadConfig {
    /// Rebuild the application when the extensions directory changes.
    pub enabled: bool,

    /// Quiet period after a change before rebuilding.
    pub debounce_ms: u64,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: 250,
        }
    }
}
