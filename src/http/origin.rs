//! Scheme and host a client used to reach the server.
//!
//! # Resolution order
//! - scheme: absolute request URI, then `X-Forwarded-Proto`, then `http`
//! - host: absolute request URI, then `X-Forwarded-Host`, then `Host`

use axum::http::{header, HeaderMap, Uri};

pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";
pub const X_FORWARDED_HOST: &str = "x-forwarded-host";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin {
    scheme: String,
    host: String,
}

impl RequestOrigin {
    pub fn from_request(uri: &Uri, headers: &HeaderMap) -> Self {
        let scheme = uri
            .scheme_str()
            .map(str::to_string)
            .or_else(|| first_value(headers, X_FORWARDED_PROTO))
            .unwrap_or_else(|| "http".to_string());

        let host = uri
            .authority()
            .map(|authority| authority.as_str().to_string())
            .or_else(|| first_value(headers, X_FORWARDED_HOST))
            .or_else(|| first_value(headers, header::HOST.as_str()))
            .unwrap_or_default();

        Self { scheme, host }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// `path` (which should start with `/`) as seen from this origin.
    pub fn absolute(&self, path: &str) -> String {
        format!("{}://{}{}", self.scheme, self.host, path)
    }

    /// Full URL of the request, query included.
    pub fn url_of(&self, uri: &Uri) -> String {
        let path = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        self.absolute(path)
    }
}

// Proxies may append several comma-separated values; the first is the client's.
fn first_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
