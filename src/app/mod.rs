//! The application: dataset, static mounts and mounted extensions.
//!
//! # Startup order
//! 1. Mount static directories and load the dataset (fatal on failure)
//! 2. Load extensions from the extensions directory (fatal on failure)
//! 3. Log the ready banner
//!
//! The result is an immutable router. Reloading builds a new application.

pub mod statics;

use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use thiserror::Error;

use crate::config::TriviaConfig;
use crate::dataset::{Dataset, DatasetError};
use crate::extension::{ExtensionCatalog, ExtensionLoader, ExtensionRegistry, LoadError, RouteEntry};
use crate::flair;
use crate::http::error::handler_404;

pub use statics::{mount_static, static_mounts, StaticMount};

/// Path of the route index.
pub const DOCS_PATH: &str = "/docs";

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Extensions(#[from] LoadError),

    #[error("cannot bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("cannot watch for changes: {0}")]
    Watch(#[from] notify::Error),
}

/// Read-only view of the application handed to handler groups.
#[derive(Clone)]
pub struct AppContext {
    dataset: Arc<Dataset>,
    config: Arc<TriviaConfig>,
}

impl AppContext {
    pub fn new(dataset: Arc<Dataset>, config: Arc<TriviaConfig>) -> Self {
        Self { dataset, config }
    }

    pub fn dataset(&self) -> Arc<Dataset> {
        Arc::clone(&self.dataset)
    }

    pub fn config(&self) -> &TriviaConfig {
        &self.config
    }
}

pub struct Application {
    context: AppContext,
    registry: Arc<ExtensionRegistry>,
    mounts: Vec<StaticMount>,
    router: Router,
}

impl Application {
    /// Run the startup sequence against `catalog`.
    pub fn startup(config: TriviaConfig, catalog: &ExtensionCatalog) -> Result<Self, StartupError> {
        tracing::info!("Starting up...");
        let config = Arc::new(config);

        let mounts = static_mounts(&config.paths);
        let (statics, dataset) = mount_files(&config, &mounts)?;
        let context = AppContext::new(Arc::new(dataset), Arc::clone(&config));

        let mut registry = ExtensionRegistry::new();
        registry.reserve(DOCS_PATH);
        for mount in &mounts {
            registry.reserve(mount.route);
        }

        let loader = ExtensionLoader::new(catalog, &config.paths.extensions);
        let loaded = loader.load(&context, registry)?;
        let registry = Arc::new(loaded.registry);

        let router = Router::new()
            .route(DOCS_PATH, get(docs_handler(Arc::clone(&registry))))
            .merge(statics)
            .merge(loaded.router)
            .fallback(handler_404);

        flair!(
            routes = registry.routes().len(),
            records = context.dataset.len(),
            "Started up successfully."
        );

        Ok(Self {
            context,
            registry,
            mounts,
            router,
        })
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn into_router(self) -> Router {
        self.router
    }

    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    pub fn dataset(&self) -> &Dataset {
        &self.context.dataset
    }

    pub fn config(&self) -> &TriviaConfig {
        self.context.config()
    }

    pub fn mounts(&self) -> &[StaticMount] {
        &self.mounts
    }
}

fn mount_files(
    config: &TriviaConfig,
    mounts: &[StaticMount],
) -> Result<(Router, Dataset), StartupError> {
    tracing::info!("Mounting files");
    let statics = mount_static(Router::new(), mounts);

    let dataset = Dataset::load(&config.paths.dataset)?;
    let missing = dataset.missing_categories();
    if !missing.is_empty() {
        tracing::warn!(
            missing = ?missing.iter().map(|c| c.as_str()).collect::<Vec<_>>(),
            "Dataset has no records for some categories"
        );
    }
    tracing::info!(dataset = %config.paths.dataset.display(), "Files mounted");

    Ok((statics, dataset))
}

fn docs_handler(
    registry: Arc<ExtensionRegistry>,
) -> impl Fn() -> std::future::Ready<Json<Vec<RouteEntry>>> + Clone + Send + Sync + 'static {
    move || std::future::ready(Json(registry.routes().to_vec()))
}
