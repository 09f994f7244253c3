//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields + message)
//!     → logging.rs (line format, colour, daily file sink)
//!
//! Extension routes additionally pass through:
//!     → access_log.rs (client, method, url, status, elapsed)
//! ```
//!
//! # Design Decisions
//! - One global subscriber, installed by the binary before startup
//! - Lifecycle banners use a dedicated target instead of a custom level
//! - Access lines are emitted after the handler returns so they carry the status

pub mod access_log;
pub mod logging;
