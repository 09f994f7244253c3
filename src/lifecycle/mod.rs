//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Supervisor (supervisor.rs):
//!     Load config → Application::startup → Bind → Serve
//!
//! Shutdown (shutdown.rs):
//!     Exit reason broadcast → Stop accepting → Drain connections
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown
//!     Watched file change → Reload (full rebuild in-process)
//! ```
//!
//! # Design Decisions
//! - A reload rebuilds config, dataset and extensions from scratch
//! - Startup errors during a reload are as fatal as on first start

pub mod shutdown;
pub mod signals;
pub mod supervisor;

pub use shutdown::{ExitReason, Shutdown};
pub use supervisor::{RunOptions, Supervisor};
