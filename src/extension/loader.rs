//! Extension discovery.
//!
//! Every `*.toml` file in the extensions directory is a manifest naming the
//! groups it enables. Files starting with `_` are disabled and skipped.
//! Manifests are read in file-name order and any failure aborts loading.

use axum::Router;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::app::AppContext;
use crate::extension::catalog::ExtensionCatalog;
use crate::extension::registry::ExtensionRegistry;
use crate::extension::LoadError;

const MANIFEST_EXTENSION: &str = "toml";

/// Contents of one extension manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtensionManifest {
    #[serde(default)]
    pub description: Option<String>,
    pub groups: Vec<String>,
}

/// Routes contributed by every loaded extension.
pub struct LoadedExtensions {
    pub router: Router,
    pub registry: ExtensionRegistry,
}

pub struct ExtensionLoader<'a> {
    catalog: &'a ExtensionCatalog,
    directory: PathBuf,
}

impl<'a> ExtensionLoader<'a> {
    pub fn new(catalog: &'a ExtensionCatalog, directory: impl Into<PathBuf>) -> Self {
        Self {
            catalog,
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Enabled manifest files, sorted by name.
    pub fn discover(&self) -> Result<Vec<PathBuf>, LoadError> {
        let entries = fs::read_dir(&self.directory).map_err(|source| LoadError::Directory {
            path: self.directory.clone(),
            source,
        })?;

        let mut manifests = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| LoadError::Directory {
                path: self.directory.clone(),
                source,
            })?;
            let path = entry.path();

            if !path.is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(MANIFEST_EXTENSION)
            {
                continue;
            }
            let disabled = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with('_'));
            if disabled {
                tracing::debug!(path = %path.display(), "Skipping disabled extension");
                continue;
            }
            manifests.push(path);
        }

        manifests.sort();
        Ok(manifests)
    }

    /// Build and merge every group named by the enabled manifests.
    ///
    /// `registry` may arrive with reserved prefixes already in place.
    pub fn load(
        &self,
        context: &AppContext,
        mut registry: ExtensionRegistry,
    ) -> Result<LoadedExtensions, LoadError> {
        tracing::info!(directory = %self.directory.display(), "Loading extensions");

        let mut router = Router::new();
        let mut loaded: Vec<&str> = Vec::new();
        for path in self.discover()? {
            let manifest = read_manifest(&path)?;

            for name in &manifest.groups {
                let factory = self.catalog.find(name).ok_or_else(|| LoadError::UnknownGroup {
                    path: path.clone(),
                    name: name.clone(),
                })?;
                if loaded.contains(&factory.name()) {
                    return Err(LoadError::DuplicateGroup {
                        path: path.clone(),
                        name: name.clone(),
                    });
                }
                loaded.push(factory.name());

                let mounted = factory.mount(context).map_err(|source| LoadError::Route {
                    group: factory.tag(),
                    source,
                })?;
                let (tag, routes, group_router) = mounted.into_parts();
                registry.claim(tag, &routes)?;
                router = router.merge(group_router);

                tracing::info!(manifest = %path.display(), "Loaded {} extension", tag);
            }
        }

        tracing::info!(groups = registry.groups().len(), "Extensions loaded");
        Ok(LoadedExtensions { router, registry })
    }
}

pub fn read_manifest(path: &Path) -> Result<ExtensionManifest, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Manifest {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| LoadError::ManifestParse {
        path: path.to_path_buf(),
        source,
    })
}
