//! API handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::api::{ApiError, AppState, ValidJson};
use crate::types::{
    SegmentationKind, SegmentationRequest, SegmentationResult, SpecificSegmentationResult,
};

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

/// Liveness check
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Mock Segmentation API is running",
    })
}

/// Run every segmentation pipeline.
///
/// The request body is validated but its values do not influence the result.
pub async fn comprehensive(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<SegmentationRequest>,
) -> Json<SegmentationResult> {
    tracing::info!(
        kind = "comprehensive",
        reference_date = ?request.reference_date,
        min_clusters = ?request.min_clusters,
        max_clusters = ?request.max_clusters,
        "Received request for comprehensive segmentation"
    );

    Json(state.catalog.comprehensive())
}

/// Run a single segmentation pipeline
pub async fn specific(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    ValidJson(request): ValidJson<SegmentationRequest>,
) -> Result<Json<SpecificSegmentationResult>, ApiError> {
    tracing::info!(
        kind = %kind,
        reference_date = ?request.reference_date,
        min_clusters = ?request.min_clusters,
        max_clusters = ?request.max_clusters,
        "Received request for {} segmentation",
        kind
    );

    let kind: SegmentationKind = kind.parse().map_err(|_| ApiError::invalid_kind())?;

    Ok(Json(state.catalog.specific(kind)))
}
