//! Shared fixtures for integration tests.
#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceExt;

use trivia_server::lifecycle::ExitReason;
use trivia_server::{Application, ExtensionCatalog, HttpServer, Shutdown, TriviaConfig};

pub const CATEGORIES: [&str; 9] = [
    "images", "bonus", "gen1", "gen2", "gen3", "gen4", "gen5", "gen6", "gen7",
];

/// A scratch directory removed on drop.
pub struct TestDir {
    path: PathBuf,
}

impl TestDir {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("trivia-test-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `content` at `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let target = self.path.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&target, content).unwrap();
        target
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Two records per category, each with a server-relative image.
pub fn sample_dataset() -> Value {
    let mut dataset = serde_json::Map::new();
    for category in CATEGORIES {
        let records: Vec<Value> = (1..=2)
            .map(|i| {
                json!({
                    "question": format!("{category} question {i}"),
                    "answer": format!("{category} answer {i}"),
                    "specific": {
                        "image": format!("/assets/{category}/{i}.png"),
                        "hint": i
                    },
                    "tags": [category, "sample"]
                })
            })
            .collect();
        dataset.insert(category.to_string(), Value::Array(records));
    }
    Value::Object(dataset)
}

/// A complete on-disk layout: assets, dataset and the given manifests.
pub fn fixture(dataset: &Value, manifests: &[(&str, &str)]) -> (TestDir, TriviaConfig) {
    let dir = TestDir::new();
    dir.write("assets/gen1/1.png", b"not really a png");
    let dataset_path = dir.write("bin/trivia_utf-8.json", dataset.to_string());
    fs::create_dir_all(dir.path().join("extensions")).unwrap();
    for (name, content) in manifests {
        dir.write(&format!("extensions/{name}"), content);
    }

    let mut config = TriviaConfig::default();
    config.paths.assets = dir.path().join("assets");
    config.paths.bin = dir.path().join("bin");
    config.paths.dataset = dataset_path;
    config.paths.extensions = dir.path().join("extensions");
    config.reload.enabled = false;

    (dir, config)
}

/// The default deployment: the sample dataset and the trivia manifest.
pub fn trivia_fixture() -> (TestDir, TriviaConfig) {
    fixture(&sample_dataset(), &[("trivia.toml", "groups = [\"trivia\"]\n")])
}

/// Router as served, request-id middleware included.
pub fn build_router(config: TriviaConfig) -> Router {
    build_router_with(config, &ExtensionCatalog::builtin())
}

/// Router as served, built against `catalog`.
#[allow(dead_code)]
pub fn build_router_with(config: TriviaConfig, catalog: &ExtensionCatalog) -> Router {
    let app = Application::startup(config, catalog).unwrap();
    HttpServer::new(app.into_router()).router().clone()
}

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, HeaderMap, Value) {
    send(router, Request::get(uri).body(Body::empty()).unwrap()).await
}

/// A running server on an ephemeral port.
pub struct RunningServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
    handle: JoinHandle<std::io::Result<()>>,
}

impl RunningServer {
    pub async fn start(config: TriviaConfig) -> Self {
        let router = Application::startup(config, &ExtensionCatalog::builtin())
            .unwrap()
            .into_router();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let handle = tokio::spawn(HttpServer::new(router).run(listener, shutdown.signal()));
        Self {
            addr,
            shutdown,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn stop(self) {
        self.shutdown.trigger(ExitReason::Shutdown);
        self.handle.await.unwrap().unwrap();
    }
}
