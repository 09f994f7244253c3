//! Per-route timing and access log.
//!
//! Wraps every extension route. One line per request, written after the
//! handler returns: `<client> <METHOD> <url> <status> <seconds>s`.

use axum::extract::{ConnectInfo, OriginalUri, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::http::RequestOrigin;

/// Identity of the wrapped handler, carried into every log line.
#[derive(Debug, Clone)]
pub struct RouteLabel {
    group: &'static str,
    name: Arc<str>,
}

impl RouteLabel {
    pub fn new(group: &'static str, name: &str) -> Self {
        Self {
            group,
            name: Arc::from(name),
        }
    }

    pub fn group(&self) -> &'static str {
        self.group
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Client address, or empty when the connection did not record one.
pub fn client_address(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_default()
}

pub fn format_line(client: &str, method: &str, url: &str, status: u16, elapsed: Duration) -> String {
    format!(
        "{} {} {} {} {:.2}s",
        client,
        method,
        url,
        status,
        elapsed.as_secs_f64()
    )
}

pub async fn access_log(State(label): State<RouteLabel>, request: Request, next: Next) -> Response {
    let client = client_address(&request);
    let method = request.method().clone();
    let uri = request
        .extensions()
        .get::<OriginalUri>()
        .map(|OriginalUri(uri)| uri.clone())
        .unwrap_or_else(|| request.uri().clone());
    let url = RequestOrigin::from_request(&uri, request.headers()).url_of(&uri);
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed();

    tracing::info!(
        group = label.group(),
        route = label.name(),
        request_id = %request_id,
        "{}",
        format_line(&client, method.as_str(), &url, response.status().as_u16(), elapsed)
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    #[test]
    fn test_line_layout() {
        let line = format_line(
            "10.0.0.1",
            "GET",
            "http://example.com/trivia?endpoint=gen1",
            200,
            Duration::from_millis(1234),
        );
        assert_eq!(line, "10.0.0.1 GET http://example.com/trivia?endpoint=gen1 200 1.23s");
    }

    #[test]
    fn test_unknown_client_is_empty() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        assert_eq!(client_address(&request), "");

        let mut request = Request::builder().uri("/").body(Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 168, 1, 9], 5000))));
        assert_eq!(client_address(&request), "192.168.1.9");
    }

    #[tokio::test]
    async fn test_interceptor_passes_response_through() {
        let router = Router::new().route(
            "/teapot",
            get(|| async { StatusCode::IM_A_TEAPOT }).layer(axum::middleware::from_fn_with_state(
                RouteLabel::new("Test", "teapot"),
                access_log,
            )),
        );

        let response = router
            .oneshot(Request::builder().uri("/teapot").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    }
}
