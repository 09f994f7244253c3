//! Compiled-in registry of handler groups.
//!
//! Manifests in the extensions directory can only name groups listed here;
//! each entry is the group's single factory entry point.

use crate::app::AppContext;
use crate::extension::group::{mount, HandlerGroup, MountedGroup};
use crate::extension::RouteError;
use crate::extensions::Trivia;

type MountFn = fn(&AppContext) -> Result<MountedGroup, RouteError>;

/// Factory for one group type.
#[derive(Clone, Copy)]
pub struct GroupFactory {
    name: &'static str,
    tag: &'static str,
    mount: MountFn,
}

impl GroupFactory {
    pub fn of<G: HandlerGroup>() -> Self {
        Self {
            name: G::NAME,
            tag: G::TAG,
            mount: mount::<G>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn mount(&self, context: &AppContext) -> Result<MountedGroup, RouteError> {
        (self.mount)(context)
    }
}

impl std::fmt::Debug for GroupFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupFactory")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .finish()
    }
}

/// Every group a manifest may reference.
#[derive(Debug, Clone, Default)]
pub struct ExtensionCatalog {
    factories: Vec<GroupFactory>,
}

impl ExtensionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups shipped with the server.
    pub fn builtin() -> Self {
        Self::new().with::<Trivia>()
    }

    /// Add `G`. A later registration under the same name replaces the earlier one.
    pub fn with<G: HandlerGroup>(mut self) -> Self {
        self.factories.retain(|factory| factory.name != G::NAME);
        self.factories.push(GroupFactory::of::<G>());
        self
    }

    pub fn find(&self, name: &str) -> Option<&GroupFactory> {
        self.factories.iter().find(|factory| factory.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.iter().map(GroupFactory::name)
    }
}
