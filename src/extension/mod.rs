//! Extension subsystem: declarative routes and directory-driven mounting.
//!
//! # Data Flow
//! ```text
//! Group definition (compile time):
//!     RouteMarker + handler(Arc<Group>, extractor)
//!     → RouteTable (name / path checks)
//!
//! Startup:
//!     extensions/*.toml (skip _*)
//!     → loader.rs (manifest → catalog lookup)
//!     → group.rs (build group, wrap routes with access log + contract)
//!     → registry.rs (path claims, route index)
//!     → merged axum Router
//! ```
//!
//! # Design Decisions
//! - Groups are compiled in; manifests only choose which ones are mounted
//! - Any manifest or route error aborts startup
//! - Routes are frozen once mounted; reload rebuilds the whole application

pub mod catalog;
pub mod descriptor;
pub mod group;
pub mod handler;
pub mod loader;
pub mod marker;
pub mod registry;

use std::path::PathBuf;
use thiserror::Error;

pub use catalog::{ExtensionCatalog, GroupFactory};
pub use descriptor::{ResponseContract, RouteDescriptor, RouteMethod};
pub use group::{mount, HandlerGroup, MountedGroup};
pub use handler::{GroupHandler, RouteTable};
pub use loader::{ExtensionLoader, ExtensionManifest, LoadedExtensions};
pub use marker::{DeclaredContract, RouteMarker};
pub use registry::{ExtensionRegistry, RouteEntry};

/// Problems with a single route declaration.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("route name must not be empty")]
    EmptyName,

    #[error("route `{name}` has invalid path `{path}`: {reason}")]
    InvalidPath {
        name: String,
        path: String,
        reason: &'static str,
    },

    #[error("route name `{0}` is already used in this group")]
    DuplicateName(String),

    #[error("{method} {path} is already bound by route `{existing}`")]
    PathConflict {
        method: RouteMethod,
        path: String,
        existing: String,
    },

    #[error("unsupported response contract `{0}`")]
    UnsupportedContract(String),
}

/// Problems while discovering and mounting extensions.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read extensions directory {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot read manifest {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid manifest {}: {source}", path.display())]
    ManifestParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("manifest {} names unknown group `{name}`", path.display())]
    UnknownGroup { path: PathBuf, name: String },

    #[error("manifest {} mounts group `{name}` a second time", path.display())]
    DuplicateGroup { path: PathBuf, name: String },

    #[error("group {group}: {source}")]
    Route {
        group: &'static str,
        source: RouteError,
    },

    #[error("group {group} cannot bind {path}: already owned by {owner}")]
    PathConflict {
        group: &'static str,
        path: String,
        owner: String,
    },
}
