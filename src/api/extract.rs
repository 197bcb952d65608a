//! Request body extraction with 422 validation errors

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderMap},
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use serde_path_to_error::Segment;

use crate::api::ApiError;

/// JSON body that must deserialize into `T` before the handler runs.
///
/// A request without `Content-Type` is still parsed as JSON; any other
/// non-JSON content type, malformed JSON or a field of the wrong type is
/// reported as a 422. Type errors carry the offending field path in `loc`.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !accepts_json(req.headers()) {
            tracing::debug!("Rejected request body with non-JSON content type");
            return Err(ApiError::validation(
                "content_type",
                vec![],
                "Expected request with `Content-Type: application/json`",
            ));
        }

        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            ApiError::validation("body_error", vec![], rejection.body_text())
        })?;

        parse_body(&bytes).map(ValidJson)
    }
}

/// Absent content type is treated as JSON; otherwise the media type must be
/// `application/json` or a `+json` suffix type.
fn accepts_json(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(header::CONTENT_TYPE) else {
        return true;
    };
    let Ok(value) = value.to_str() else {
        return false;
    };

    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}

fn parse_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);

    match serde_path_to_error::deserialize(&mut deserializer) {
        Ok(value) => {
            deserializer
                .end()
                .map_err(|err| rejected(Vec::new(), &err))?;
            Ok(value)
        }
        Err(err) => {
            let loc = err
                .path()
                .iter()
                .filter_map(|segment| match segment {
                    Segment::Map { key } => Some(json!(key)),
                    Segment::Seq { index } => Some(json!(index)),
                    Segment::Enum { variant } => Some(json!(variant)),
                    _ => None,
                })
                .collect();
            Err(rejected(loc, err.inner()))
        }
    }
}

fn rejected(loc: Vec<Value>, err: &serde_json::Error) -> ApiError {
    let kind = if err.is_data() {
        "type_error"
    } else {
        "json_invalid"
    };
    tracing::debug!(kind, error = %err, "Rejected request body");
    ApiError::validation(kind, loc, err.to_string())
}
