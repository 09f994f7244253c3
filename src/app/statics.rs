//! Read-only static directories.

use axum::Router;
use std::path::PathBuf;
use tower_http::services::ServeDir;

use crate::config::PathsConfig;

/// One directory served under a URL prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticMount {
    pub route: &'static str,
    pub directory: PathBuf,
}

/// `/assets` and `/bin`, in mount order.
pub fn static_mounts(paths: &PathsConfig) -> Vec<StaticMount> {
    vec![
        StaticMount {
            route: "/assets",
            directory: paths.assets.clone(),
        },
        StaticMount {
            route: "/bin",
            directory: paths.bin.clone(),
        },
    ]
}

pub fn mount_static(router: Router, mounts: &[StaticMount]) -> Router {
    mounts.iter().fold(router, |router, mount| {
        if !mount.directory.is_dir() {
            tracing::warn!(
                route = mount.route,
                directory = %mount.directory.display(),
                "Static directory does not exist, every request will 404"
            );
        }
        tracing::info!("Mounted {}", mount.route);
        router.nest_service(mount.route, ServeDir::new(&mount.directory))
    })
}
