//! HTTP plumbing shared by the application and its extensions.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum serve, request id, graceful shutdown)
//!     → app router (built-ins, static mounts, extension routes)
//!     → origin.rs (scheme/host the client used)
//!     → error.rs (JSON error bodies)
//! ```

pub mod error;
pub mod origin;
pub mod server;

pub use error::AppError;
pub use origin::RequestOrigin;
pub use server::HttpServer;
