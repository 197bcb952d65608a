//! Error responses returned by the API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

/// An HTTP error: status plus the `detail` body, optionally carrying a trace
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: Value,
    pub trace: Option<String>,
}

impl ApiError {
    pub fn invalid_kind() -> Self {
        Self::bad_request("Invalid segmentation type")
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: Value::String(msg.into()),
            trace: None,
        }
    }

    /// 422 with a single validation issue located at `body` plus `path`
    pub fn validation(kind: &str, path: Vec<Value>, msg: impl Into<String>) -> Self {
        let mut loc = vec![Value::from("body")];
        loc.extend(path);
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: json!([{
                "loc": loc,
                "msg": msg.into(),
                "type": kind,
            }]),
            trace: None,
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: Value::String(msg.into()),
            trace: None,
        }
    }

    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.trace {
            Some(trace) => json!({
                "detail": self.detail,
                "traceback": trace,
            }),
            None => json!({
                "detail": self.detail,
            }),
        };
        (self.status, Json(body)).into_response()
    }
}
