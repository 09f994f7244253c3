//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and formats (bind address, log level, file names)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: TriviaConfig → Result<(), Vec<ValidationError>>
//! - Filesystem existence is checked at startup, not here

use std::fmt;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

use crate::config::schema::TriviaConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &TriviaConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("`{}` is not a socket address", config.listener.bind_address),
        ));
    }

    if EnvFilter::try_new(&config.logging.level).is_err() {
        errors.push(ValidationError::new(
            "logging.level",
            format!("`{}` is not a valid filter directive", config.logging.level),
        ));
    }

    for (field, value) in [
        ("logging.extension", &config.logging.extension),
        ("logging.file_prefix", &config.logging.file_prefix),
    ] {
        if value.is_empty() || value.contains(['/', '\\']) {
            errors.push(ValidationError::new(field, "must be a plain, non-empty file name part"));
        }
    }

    for (field, path) in [
        ("paths.assets", &config.paths.assets),
        ("paths.bin", &config.paths.bin),
        ("paths.dataset", &config.paths.dataset),
        ("paths.extensions", &config.paths.extensions),
    ] {
        if path.as_os_str().is_empty() {
            errors.push(ValidationError::new(field, "must not be empty"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
