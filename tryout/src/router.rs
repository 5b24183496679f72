use std::future::ready;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::trace::TraceLayer;

use crate::body::BodyRendering;
use crate::prometheus::track_metrics;
use crate::{endpoint, stores, time::TimeSource};

/// Where captured requests can be looked at.
pub const VIEWER_PATH: &str = "/";

#[derive(Clone)]
pub struct State {
    pub store: Arc<dyn stores::RecordStore + Send + Sync>,
    pub timesource: Arc<dyn TimeSource + Send + Sync>,
    pub rendering: BodyRendering,
}

pub fn router<
    TZ: TimeSource + Send + Sync + 'static,
    S: stores::RecordStore + Send + Sync + 'static,
>(
    timesource: TZ,
    store: S,
    rendering: BodyRendering,
    max_body_size: usize,
    metrics: Option<PrometheusHandle>,
) -> Router {
    let state = State {
        store: Arc::new(store),
        timesource: Arc::new(timesource),
        rendering,
    };

    // Only GET on the viewer path and GET on the metrics path are reserved,
    // every other method and path gets captured.
    let mut router = Router::new().route(
        VIEWER_PATH,
        get(endpoint::index)
            .head(endpoint::request)
            .fallback(endpoint::request),
    );

    // Installing a global recorder when used as a library (during tests etc)
    // does not work well, so the caller decides.
    if let Some(recorder_handle) = metrics {
        router = router.route(
            "/metrics",
            get(move || ready(recorder_handle.render())).fallback(endpoint::request),
        );
    }

    router
        .fallback(endpoint::request)
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(track_metrics))
        .with_state(state)
}
