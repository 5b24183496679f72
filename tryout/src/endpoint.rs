use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Query, State};
use axum::http::{HeaderMap, Method, Uri, Version};
use axum::Json;
use bytes::Bytes;
use futures::TryStreamExt;
use serde::Deserialize;
use tracing::{debug, error, instrument};

use crate::api::{CaptureResponse, StoreError};
use crate::capture::{capture, Capture, CaptureRequest};
use crate::prometheus::{report_captured_request, report_ignored_request};
use crate::record::Record;
use crate::router::{self, VIEWER_PATH};
use crate::stores::report_store_error;

#[derive(Debug, Default, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    #[default]
    Newest,
    Oldest,
}

#[derive(Debug, Default, Deserialize)]
pub struct ViewerQuery {
    #[serde(default)]
    pub order: Order,
}

fn version_token(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_11 => "1.1",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "",
    }
}

fn header_pairs(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_owned(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

/// Catch-all handler: record whatever came in and point the client at the viewer.
#[instrument(skip_all, fields(method = %method, path = %uri.path()))]
pub async fn request(
    State(state): State<router::State>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CaptureResponse>, StoreError> {
    let request = CaptureRequest {
        method: method.as_str().to_owned(),
        scheme: uri.scheme_str().unwrap_or("http").to_owned(),
        http_version: version_token(version).to_owned(),
        client_address: connect_info
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_default(),
        path: uri.path().to_owned(),
        query: uri.query().map(str::to_owned),
        headers: header_pairs(&headers),
        body,
    };

    let record = match capture(request, state.timesource.as_ref(), state.rendering) {
        Capture::Recorded(record) => record,
        Capture::Ignored => {
            debug!("ignoring favicon request");
            report_ignored_request("favicon");
            return Ok(Json(CaptureResponse::ignored("favicon")));
        }
    };

    if let Err(err) = state.store.append(&record).await {
        error!("failed to store captured request: {}", err);
        report_store_error(&err);
        return Err(err);
    }

    report_captured_request();
    Ok(Json(CaptureResponse::recorded(VIEWER_PATH)))
}

/// Every stored record, newest first unless `?order=oldest` is given.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<router::State>,
    Query(query): Query<ViewerQuery>,
) -> Result<Json<Vec<Record>>, StoreError> {
    let records: Result<Vec<Record>, StoreError> = match state.store.all().await {
        Ok(stream) => stream.try_collect().await,
        Err(err) => Err(err),
    };

    let mut records = records.map_err(|err| {
        error!("failed to read captured requests: {}", err);
        report_store_error(&err);
        err
    })?;

    if query.order == Order::Newest {
        records.reverse();
    }
    Ok(Json(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_tokens() {
        assert_eq!(version_token(Version::HTTP_11), "1.1");
        assert_eq!(version_token(Version::HTTP_2), "2");
        assert_eq!(version_token(Version::HTTP_10), "1.0");
    }

    #[test]
    fn non_utf8_header_values_are_kept_lossily() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-raw",
            axum::http::HeaderValue::from_bytes(b"caf\xe9").unwrap(),
        );

        assert_eq!(
            header_pairs(&headers),
            vec![("x-raw".to_string(), "caf\u{fffd}".to_string())]
        );
    }
}
