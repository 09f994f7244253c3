//! Group handlers and the per-group route table.

use axum::extract::{FromRequest, State};
use axum::response::IntoResponse;
use axum::routing::{on, MethodRouter};
use std::future::Future;
use std::sync::Arc;

use crate::extension::descriptor::{RouteDescriptor, RouteMethod};
use crate::extension::marker::{DeclaredContract, RouteMarker};
use crate::extension::RouteError;

/// A handler bound to a group instance.
///
/// Implemented for every `Fn(Arc<G>, E) -> impl Future` where `E` is an axum
/// extractor (use `()` for none). The group receiver comes first, so a
/// function that does not take one cannot be marked as a route of `G`.
pub trait GroupHandler<G, E, M>: Clone + Send + Sync + Sized + 'static {
    type Output: IntoResponse + DeclaredContract;

    fn into_method_router(self, method: RouteMethod) -> MethodRouter<Arc<G>>;
}

impl<G, F, Fut, E, M> GroupHandler<G, E, M> for F
where
    G: Send + Sync + 'static,
    F: Fn(Arc<G>, E) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future + Send + 'static,
    Fut::Output: IntoResponse + DeclaredContract,
    E: FromRequest<Arc<G>, M> + Send + 'static,
    M: Send + 'static,
{
    type Output = Fut::Output;

    fn into_method_router(self, method: RouteMethod) -> MethodRouter<Arc<G>> {
        let handler = move |State(group): State<Arc<G>>, extracted: E| {
            let inner = self.clone();
            async move { inner(group, extracted).await }
        };
        on::<_, (M, State<Arc<G>>, E), Arc<G>>(method.filter(), handler)
    }
}

/// A descriptor paired with the handler it describes.
pub struct MarkedRoute<G> {
    descriptor: RouteDescriptor,
    method_router: MethodRouter<Arc<G>>,
}

impl<G> MarkedRoute<G> {
    pub fn descriptor(&self) -> &RouteDescriptor {
        &self.descriptor
    }

    pub(crate) fn into_parts(self) -> (RouteDescriptor, MethodRouter<Arc<G>>) {
        (self.descriptor, self.method_router)
    }
}

/// Routes declared by one handler group, in declaration order.
pub struct RouteTable<G> {
    entries: Vec<MarkedRoute<G>>,
}

impl<G: Send + Sync + 'static> RouteTable<G> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Attach `marker` to `handler`.
    ///
    /// Names must be unique within the table, and a path may be bound only
    /// once per method. Paths differing only in capture names count as the
    /// same path and must be spelled identically.
    ///
    /// A handler must take the group as its first argument:
    ///
    /// ```compile_fail
    /// use trivia_server::extension::{RouteMarker, RouteTable};
    ///
    /// struct Greeter;
    ///
    /// async fn free_standing(name: String) -> String {
    ///     name
    /// }
    ///
    /// let mut table = RouteTable::<Greeter>::new();
    /// table.add(RouteMarker::get("hello"), free_standing).unwrap();
    /// ```
    pub fn add<H, E, M>(&mut self, marker: RouteMarker, handler: H) -> Result<(), RouteError>
    where
        H: GroupHandler<G, E, M>,
    {
        let descriptor =
            marker.into_descriptor(<H::Output as DeclaredContract>::declared())?;

        if self
            .entries
            .iter()
            .any(|entry| entry.descriptor.name() == descriptor.name())
        {
            return Err(RouteError::DuplicateName(descriptor.name().to_string()));
        }
        let key = descriptor.route_key();
        if let Some(existing) = self.entries.iter().find(|entry| {
            entry.descriptor.route_key() == key
                && (entry.descriptor.method() == descriptor.method()
                    || entry.descriptor.path() != descriptor.path())
        }) {
            return Err(RouteError::PathConflict {
                method: descriptor.method(),
                path: descriptor.path().to_string(),
                existing: existing.descriptor.name().to_string(),
            });
        }

        let method_router = handler.into_method_router(descriptor.method());
        self.entries.push(MarkedRoute {
            descriptor,
            method_router,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &RouteDescriptor> {
        self.entries.iter().map(MarkedRoute::descriptor)
    }

    pub(crate) fn into_entries(self) -> Vec<MarkedRoute<G>> {
        self.entries
    }
}

impl<G: Send + Sync + 'static> Default for RouteTable<G> {
    fn default() -> Self {
        Self::new()
    }
}
