//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → CLI overrides (main.rs)
//!     → TriviaConfig (validated, immutable)
//!     → shared via Arc with the application and its groups
//!
//! On change:
//!     watcher.rs detects change in extensions dir or config file
//!     → supervisor stops the server
//!     → config, dataset and extensions are loaded again from scratch
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{ListenerConfig, LoggingConfig, PathsConfig, ReloadConfig, TriviaConfig};
pub use watcher::ReloadWatcher;
