//! Handler groups and their registration pass.

use axum::http::header::CONTENT_TYPE;
use axum::middleware;
use axum::routing::MethodRouter;
use axum::Router;
use std::sync::Arc;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::app::AppContext;
use crate::extension::descriptor::RouteDescriptor;
use crate::extension::handler::RouteTable;
use crate::extension::RouteError;
use crate::observability::access_log::{access_log, RouteLabel};

/// A named collection of related endpoints mounted together.
///
/// Routes are declared once per type in [`HandlerGroup::routes`]; every
/// handler takes the group instance as its receiver, so the descriptors are
/// bound to the instance built by [`HandlerGroup::build`].
pub trait HandlerGroup: Sized + Send + Sync + 'static {
    /// Key used by extension manifests.
    const NAME: &'static str;

    /// Tag shown in logs and the route index.
    const TAG: &'static str;

    fn build(context: &AppContext) -> Self;

    fn routes(table: &mut RouteTable<Self>) -> Result<(), RouteError>;
}

/// A group after registration: its descriptors and a state-free router.
pub struct MountedGroup {
    tag: &'static str,
    routes: Vec<RouteDescriptor>,
    router: Router,
}

impl MountedGroup {
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    pub fn into_parts(self) -> (&'static str, Vec<RouteDescriptor>, Router) {
        (self.tag, self.routes, self.router)
    }
}

/// Build `G` against `context` and register every route it declares.
pub fn mount<G: HandlerGroup>(context: &AppContext) -> Result<MountedGroup, RouteError> {
    let group = Arc::new(G::build(context));

    let mut table = RouteTable::<G>::new();
    G::routes(&mut table)?;

    let mut bound: Vec<(String, MethodRouter<Arc<G>>)> = Vec::with_capacity(table.len());
    let mut routes = Vec::with_capacity(table.len());

    for entry in table.into_entries() {
        let (descriptor, method_router) = entry.into_parts();
        let (descriptor, method_router) = register(G::TAG, descriptor, method_router);

        tracing::info!(group = G::TAG, "Loaded {} route", descriptor.name());

        // Same path, different method: the table already ruled out overlaps.
        match bound.iter().position(|(path, _)| path == descriptor.path()) {
            Some(index) => {
                let (path, existing) = bound.remove(index);
                bound.insert(index, (path, existing.merge(method_router)));
            }
            None => bound.push((descriptor.path().to_string(), method_router)),
        }
        routes.push(descriptor);
    }

    let router = bound
        .into_iter()
        .fold(Router::new(), |router, (path, method_router)| {
            router.route(&path, method_router)
        })
        .with_state(group);

    Ok(MountedGroup {
        tag: G::TAG,
        routes,
        router,
    })
}

/// Wrap one route with its contract and the access-log interceptor.
///
/// A contract the router cannot express is dropped and the route is bound
/// again without one.
fn register<G: Send + Sync + 'static>(
    tag: &'static str,
    descriptor: RouteDescriptor,
    method_router: MethodRouter<Arc<G>>,
) -> (RouteDescriptor, MethodRouter<Arc<G>>) {
    let (descriptor, content_type) = match descriptor.response_contract().header_value() {
        Ok(content_type) => (descriptor, content_type),
        Err(err) => {
            tracing::warn!(
                group = tag,
                route = descriptor.name(),
                error = %err,
                "Response contract rejected, registering without it"
            );
            (descriptor.without_contract(), None)
        }
    };

    let method_router = match content_type {
        Some(value) => {
            method_router.layer(SetResponseHeaderLayer::if_not_present(CONTENT_TYPE, value))
        }
        None => method_router,
    };

    let label = RouteLabel::new(tag, descriptor.name());
    let method_router = method_router.layer(middleware::from_fn_with_state(label, access_log));

    (descriptor, method_router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::descriptor::ResponseContract;
    use crate::extension::marker::RouteMarker;
    use crate::test_support::{capture_subscriber, test_context, CaptureWriter};
    use axum::body::{to_bytes, Body};
    use axum::extract::ConnectInfo;
    use std::net::SocketAddr;
    use axum::http::{Request, StatusCode};
    use axum::response::{IntoResponse, Response};
    use tower::ServiceExt;

    struct Echo {
        greeting: String,
    }

    impl Echo {
        async fn hello(self: Arc<Self>, _: ()) -> String {
            self.greeting.clone()
        }

        async fn raw(self: Arc<Self>, _: ()) -> Response {
            (StatusCode::OK, [("x-raw", "1")]).into_response()
        }

        async fn broken(self: Arc<Self>, _: ()) -> Response {
            StatusCode::ACCEPTED.into_response()
        }
    }

    impl HandlerGroup for Echo {
        const NAME: &'static str = "echo";
        const TAG: &'static str = "Echo";

        fn build(_: &AppContext) -> Self {
            Self {
                greeting: "hello".to_string(),
            }
        }

        fn routes(table: &mut RouteTable<Self>) -> Result<(), RouteError> {
            table.add(RouteMarker::get("hello"), Self::hello)?;
            table.add(
                RouteMarker::get("raw").contract(ResponseContract::Media("application/x-trivia".into())),
                Self::raw,
            )?;
            table.add(
                RouteMarker::post("broken")
                    .path("/hello")
                    .contract(ResponseContract::Media("nonsense".into())),
                Self::broken,
            )?;
            Ok(())
        }
    }

    async fn send(router: Router, method: &str, uri: &str) -> Response {
        router
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_mount_registers_every_route() {
        let mounted = mount::<Echo>(&test_context()).unwrap();
        let names: Vec<_> = mounted.routes().iter().map(|d| d.name()).collect();
        assert_eq!(mounted.tag(), "Echo");
        assert_eq!(names, vec!["hello", "raw", "broken"]);

        let response = send(mounted.into_parts().2, "GET", "/hello").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"hello");
    }

    #[tokio::test]
    async fn test_contract_stamps_content_type() {
        let (_, _, router) = mount::<Echo>(&test_context()).unwrap().into_parts();
        let response = send(router, "GET", "/raw").await;
        assert_eq!(response.headers()[CONTENT_TYPE], "application/x-trivia");
        assert_eq!(response.headers()["x-raw"], "1");
    }

    #[tokio::test]
    async fn test_rejected_contract_falls_back_to_generic() {
        let mounted = mount::<Echo>(&test_context()).unwrap();
        let broken = mounted
            .routes()
            .iter()
            .find(|d| d.name() == "broken")
            .unwrap();
        assert_eq!(broken.response_contract(), &ResponseContract::Generic);

        let response = send(mounted.into_parts().2, "POST", "/hello").await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert!(response.headers().get(CONTENT_TYPE).is_none());
    }

    #[tokio::test]
    async fn test_unmatched_method_is_rejected() {
        let (_, _, router) = mount::<Echo>(&test_context()).unwrap().into_parts();
        let response = send(router, "DELETE", "/hello").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_mounted_routes_log_registration_and_access() {
        let capture = CaptureWriter::default();
        let _guard = tracing::subscriber::set_default(capture_subscriber(&capture));

        let (_, _, router) = mount::<Echo>(&test_context()).unwrap().into_parts();

        let mut request = Request::builder()
            .uri("/hello?lang=en")
            .header("host", "quiz.test")
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([10, 0, 0, 7], 4000))));
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let output = capture.contents();
        for name in ["hello", "raw", "broken"] {
            assert!(
                output.contains(&format!("| INFO | Loaded {name} route")),
                "{output}"
            );
        }

        let access: Vec<_> = output
            .lines()
            .filter(|line| line.contains("| INFO | 10.0.0.7 GET "))
            .collect();
        assert_eq!(access.len(), 1, "{output}");
        let line = access[0];
        let message = line.split("| INFO | ").nth(1).unwrap();
        let mut parts = message.split_whitespace();
        assert_eq!(parts.next(), Some("10.0.0.7"));
        assert_eq!(parts.next(), Some("GET"));
        assert_eq!(parts.next(), Some("http://quiz.test/hello?lang=en"));
        assert_eq!(parts.next(), Some("200"));
        let elapsed = parts.next().unwrap();
        assert!(elapsed.ends_with('s'), "{line}");
        assert!(elapsed.trim_end_matches('s').parse::<f64>().is_ok(), "{line}");
        assert!(line.contains("route=") && line.contains("hello"), "{line}");
    }
}
