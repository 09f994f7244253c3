//! Registry of mounted groups.
//!
//! Append-only while the application starts; read-only afterwards. The
//! registry also owns path claims so two groups, or a group and a built-in
//! mount, cannot bind the same path.

use serde::Serialize;

use crate::extension::descriptor::{route_key, ResponseContract, RouteDescriptor, RouteMethod};
use crate::extension::LoadError;

/// One route as listed by the route index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    pub group: &'static str,
    pub name: String,
    pub method: RouteMethod,
    pub path: String,
    pub contract: ResponseContract,
}

#[derive(Debug, Default)]
pub struct ExtensionRegistry {
    reserved: Vec<String>,
    groups: Vec<&'static str>,
    routes: Vec<RouteEntry>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `prefix` (and everything under it) away from groups.
    pub fn reserve(&mut self, prefix: impl Into<String>) {
        self.reserved.push(prefix.into());
    }

    /// Record a mounted group, refusing paths already claimed elsewhere.
    pub fn claim(&mut self, tag: &'static str, routes: &[RouteDescriptor]) -> Result<(), LoadError> {
        for descriptor in routes {
            let key = descriptor.route_key();
            if let Some(prefix) = self.reserved.iter().find(|prefix| {
                descriptor.path() == prefix.as_str()
                    || descriptor
                        .path()
                        .strip_prefix(prefix.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }) {
                return Err(LoadError::PathConflict {
                    group: tag,
                    path: descriptor.path().to_string(),
                    owner: prefix.clone(),
                });
            }

            if let Some(owner) = self
                .routes
                .iter()
                .find(|entry| entry.group != tag && route_key(&entry.path) == key)
            {
                return Err(LoadError::PathConflict {
                    group: tag,
                    path: descriptor.path().to_string(),
                    owner: owner.group.to_string(),
                });
            }
        }

        if !self.groups.contains(&tag) {
            self.groups.push(tag);
        }
        self.routes.extend(routes.iter().map(|descriptor| RouteEntry {
            group: tag,
            name: descriptor.name().to_string(),
            method: descriptor.method(),
            path: descriptor.path().to_string(),
            contract: descriptor.response_contract().clone(),
        }));
        Ok(())
    }

    pub fn groups(&self) -> &[&'static str] {
        &self.groups
    }

    pub fn routes(&self) -> &[RouteEntry] {
        &self.routes
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
