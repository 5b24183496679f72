#![allow(dead_code)]

use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use axum::Router;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::Value;
use tower::ServiceExt;

use tryout::body::BodyRendering;
use tryout::router::router;
use tryout::stores::RecordStore;
use tryout::time::FixedTime;

pub const NOW: &str = "2024-02-03 04:05:06";

pub fn fixed_time() -> FixedTime {
    FixedTime {
        time: NOW.to_string(),
    }
}

pub fn app<S: RecordStore + Send + Sync + 'static>(store: S) -> Router {
    router(fixed_time(), store, BodyRendering::Hex, 1024 * 1024, None)
}

/// Same router with a `/metrics` route backed by a recorder that is never
/// installed globally.
pub fn app_with_metrics<S: RecordStore + Send + Sync + 'static>(store: S) -> Router {
    let handle = PrometheusBuilder::new().build_recorder().handle();
    router(fixed_time(), store, BodyRendering::Hex, 1024 * 1024, Some(handle))
}

pub fn client_addr() -> SocketAddr {
    SocketAddr::from(([10, 1, 2, 3], 45678))
}

/// Build a request as it would arrive from a connected client.
pub fn request(method: &str, uri: &str, body: impl Into<Body>) -> Request<Body> {
    let mut req = Request::builder()
        .method(method)
        .uri(uri)
        .body(body.into())
        .expect("valid request");
    req.extensions_mut().insert(ConnectInfo(client_addr()));
    req
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.expect("infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    let json = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, json)
}
