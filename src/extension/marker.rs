//! Declarative route markers.
//!
//! A [`RouteMarker`] is written next to a handler when a group declares its
//! routes. It carries the optional parts of a descriptor; whatever it leaves
//! out is filled from the handler itself (name-derived path, the contract
//! declared by the return type).

use axum::http::StatusCode;
use axum::response::{Html, Response};
use axum::Json;

use crate::extension::descriptor::{ResponseContract, RouteDescriptor, RouteMethod};
use crate::extension::RouteError;

/// Contract a handler's return type declares on its own.
pub trait DeclaredContract {
    fn declared() -> ResponseContract {
        ResponseContract::Generic
    }
}

impl DeclaredContract for Response {}

impl DeclaredContract for StatusCode {}

impl DeclaredContract for () {}

impl<T> DeclaredContract for Json<T> {
    fn declared() -> ResponseContract {
        ResponseContract::Json
    }
}

impl<T> DeclaredContract for Html<T> {
    fn declared() -> ResponseContract {
        ResponseContract::Html
    }
}

impl DeclaredContract for String {
    fn declared() -> ResponseContract {
        ResponseContract::Text
    }
}

impl DeclaredContract for &'static str {
    fn declared() -> ResponseContract {
        ResponseContract::Text
    }
}

impl<R: DeclaredContract> DeclaredContract for (StatusCode, R) {
    fn declared() -> ResponseContract {
        R::declared()
    }
}

impl<T: DeclaredContract, E> DeclaredContract for Result<T, E> {
    fn declared() -> ResponseContract {
        T::declared()
    }
}

/// Route metadata attached to a group handler.
#[derive(Debug, Clone)]
pub struct RouteMarker {
    name: String,
    path: Option<String>,
    method: RouteMethod,
    contract: Option<ResponseContract>,
}

impl RouteMarker {
    pub fn new(name: impl Into<String>, method: RouteMethod) -> Self {
        Self {
            name: name.into(),
            path: None,
            method,
            contract: None,
        }
    }

    pub fn get(name: impl Into<String>) -> Self {
        Self::new(name, RouteMethod::Get)
    }

    pub fn post(name: impl Into<String>) -> Self {
        Self::new(name, RouteMethod::Post)
    }

    /// Explicit path. Defaults to `/<name>`.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn method(mut self, method: RouteMethod) -> Self {
        self.method = method;
        self
    }

    /// Explicit response contract. Defaults to what the handler declares.
    pub fn contract(mut self, contract: ResponseContract) -> Self {
        self.contract = Some(contract);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolve the marker into a descriptor.
    pub fn into_descriptor(self, declared: ResponseContract) -> Result<RouteDescriptor, RouteError> {
        let path = self.path.unwrap_or_else(|| format!("/{}", self.name));
        let contract = self.contract.unwrap_or(declared);
        RouteDescriptor::new(self.name, path, self.method, contract)
    }
}
