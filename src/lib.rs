//! Trivia HTTP service with directory-driven extensions.

pub mod app;
pub mod config;
pub mod dataset;
pub mod extension;
pub mod extensions;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use app::{AppContext, Application, StartupError};
pub use config::schema::TriviaConfig;
pub use extension::ExtensionCatalog;
pub use http::HttpServer;
pub use lifecycle::{Shutdown, Supervisor};
