use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct CaptureResponse {
    pub message: String,
}

impl CaptureResponse {
    pub fn recorded(viewer_path: &str) -> Self {
        CaptureResponse {
            message: format!("check your request at server URL: {viewer_path}"),
        }
    }

    pub fn ignored(what: &str) -> Self {
        CaptureResponse {
            message: format!("{what} ignored"),
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to write record to store: {0}")]
    Write(#[source] std::io::Error),
    #[error("failed to read records from store: {0}")]
    Read(#[source] std::io::Error),
}

impl StoreError {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreError::Write(_) => "write",
            StoreError::Read(_) => "read",
        }
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
