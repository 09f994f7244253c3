//! HTTP server setup.
//!
//! # Responsibilities
//! - Wrap the application router with request-id middleware
//! - Bind the router to a listener with client addresses attached
//! - Drain in-flight requests when shutdown is requested

use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::flair;

/// HTTP server for the trivia application.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(router: Router) -> Self {
        Self {
            router: Self::build_router(router),
        }
    }

    /// Outer middleware shared by every route, mounts included.
    fn build_router(router: Router) -> Router {
        router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        flair!(address = %addr, "Running...");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.await;
                flair!("Shutting down...");
            })
            .await?;

        tracing::info!("Shut down successfully.");
        Ok(())
    }

    pub fn router(&self) -> &Router {
        &self.router
    }
}
