//! Route descriptors.
//!
//! A descriptor is the immutable record of one HTTP binding: where it lives,
//! which method it answers, what it promises to return, and what it is called.

use axum::http::{header::HeaderValue, Method};
use axum::routing::MethodFilter;
use serde::Serialize;
use std::fmt;

use crate::extension::RouteError;

/// HTTP method a route answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RouteMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl RouteMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            RouteMethod::Get => "GET",
            RouteMethod::Post => "POST",
            RouteMethod::Put => "PUT",
            RouteMethod::Patch => "PATCH",
            RouteMethod::Delete => "DELETE",
            RouteMethod::Head => "HEAD",
            RouteMethod::Options => "OPTIONS",
        }
    }

    /// Filter used when binding the route into an axum method router.
    pub fn filter(self) -> MethodFilter {
        match self {
            RouteMethod::Get => MethodFilter::GET,
            RouteMethod::Post => MethodFilter::POST,
            RouteMethod::Put => MethodFilter::PUT,
            RouteMethod::Patch => MethodFilter::PATCH,
            RouteMethod::Delete => MethodFilter::DELETE,
            RouteMethod::Head => MethodFilter::HEAD,
            RouteMethod::Options => MethodFilter::OPTIONS,
        }
    }
}

impl From<RouteMethod> for Method {
    fn from(method: RouteMethod) -> Self {
        match method {
            RouteMethod::Get => Method::GET,
            RouteMethod::Post => Method::POST,
            RouteMethod::Put => Method::PUT,
            RouteMethod::Patch => Method::PATCH,
            RouteMethod::Delete => Method::DELETE,
            RouteMethod::Head => Method::HEAD,
            RouteMethod::Options => Method::OPTIONS,
        }
    }
}

impl fmt::Display for RouteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a route promises to send back.
///
/// Anything other than `Generic` is enforced by stamping `Content-Type` on
/// responses that leave the handler without one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseContract {
    #[default]
    Generic,
    Json,
    Text,
    Html,
    /// Arbitrary media type, e.g. `application/problem+json`.
    Media(String),
}

impl ResponseContract {
    pub fn media_type(&self) -> Option<&str> {
        match self {
            ResponseContract::Generic => None,
            ResponseContract::Json => Some("application/json"),
            ResponseContract::Text => Some("text/plain; charset=utf-8"),
            ResponseContract::Html => Some("text/html; charset=utf-8"),
            ResponseContract::Media(media) => Some(media.as_str()),
        }
    }

    /// Header value the router stamps on responses, if any.
    ///
    /// Fails for media types the router cannot express as a `Content-Type`.
    pub fn header_value(&self) -> Result<Option<HeaderValue>, RouteError> {
        let Some(media) = self.media_type() else {
            return Ok(None);
        };

        let (kind, subtype) = media
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .split_once('/')
            .unwrap_or_default();
        if kind.is_empty() || subtype.is_empty() || subtype.contains('/') {
            return Err(RouteError::UnsupportedContract(media.to_string()));
        }

        HeaderValue::from_str(media)
            .map(Some)
            .map_err(|_| RouteError::UnsupportedContract(media.to_string()))
    }
}

impl fmt::Display for ResponseContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseContract::Generic => f.write_str("generic"),
            ResponseContract::Json => f.write_str("json"),
            ResponseContract::Text => f.write_str("text"),
            ResponseContract::Html => f.write_str("html"),
            ResponseContract::Media(media) => write!(f, "media({media})"),
        }
    }
}

/// Immutable description of one HTTP binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDescriptor {
    path: String,
    method: RouteMethod,
    response_contract: ResponseContract,
    name: String,
}

impl RouteDescriptor {
    /// Build a descriptor, checking that the name is set and the path is a
    /// rooted route in the router's `{capture}` syntax.
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        method: RouteMethod,
        response_contract: ResponseContract,
    ) -> Result<Self, RouteError> {
        let name = name.into();
        let path = path.into();

        if name.trim().is_empty() {
            return Err(RouteError::EmptyName);
        }
        if let Err(reason) = check_path(&path) {
            return Err(RouteError::InvalidPath { name, path, reason });
        }

        Ok(Self {
            path,
            method,
            response_contract,
            name,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> RouteMethod {
        self.method
    }

    /// Path with capture names erased. Equal keys match the same requests.
    pub fn route_key(&self) -> String {
        route_key(&self.path)
    }

    pub fn response_contract(&self) -> &ResponseContract {
        &self.response_contract
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Same binding with the contract dropped.
    pub fn without_contract(&self) -> Self {
        Self {
            response_contract: ResponseContract::Generic,
            ..self.clone()
        }
    }
}

/// Captures are `{name}` or a trailing `{*name}`, each spanning a whole
/// segment. The router panics on anything else, including `:name`.
fn check_path(path: &str) -> Result<(), &'static str> {
    let Some(rest) = path.strip_prefix('/') else {
        return Err("does not start with `/`");
    };

    let segments: Vec<&str> = rest.split('/').collect();
    let last = segments.len() - 1;
    for (index, segment) in segments.iter().enumerate() {
        if segment.starts_with(':') || segment.starts_with('*') {
            return Err("captures are written `{name}` or `{*name}`");
        }
        if !segment.contains(|c| c == '{' || c == '}') {
            continue;
        }

        let inner = segment
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .ok_or("a capture must span a whole segment")?;
        let (catch_all, name) = match inner.strip_prefix('*') {
            Some(name) => (true, name),
            None => (false, inner),
        };
        if name.is_empty() || name.contains(|c| c == '{' || c == '}' || c == '*') {
            return Err("capture names must be non-empty and plain");
        }
        if catch_all && index != last {
            return Err("a catch-all capture must be the last segment");
        }
    }
    Ok(())
}

/// `path` with every `{name}` turned into `{}` and every `{*name}` into `{*}`.
pub fn route_key(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if segment.starts_with("{*") {
                "{*}"
            } else if segment.starts_with('{') {
                "{}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
