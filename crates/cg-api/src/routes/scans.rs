//! Scan routes

use crate::auth::Session;
use crate::db::HISTORY_LIMIT;
use crate::error::{ApiError, ApiResult};
use crate::models::{AnalysisResponse, HistoryResponse, ScanResponse};
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    Json,
};
use std::sync::Arc;

pub async fn create_scan(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut multipart: Multipart,
) -> ApiResult<Json<AnalysisResponse>> {
    let mut image = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            image = field.bytes().await?.to_vec();
        }
    }

    if image.is_empty() {
        return Err(ApiError::BadRequest(
            "Upload a leaf image in the `file` field.".to_string(),
        ));
    }

    let result = crate::workers::run_analysis(state, &session, image).await?;
    Ok(Json(result))
}

pub async fn list_scans(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> ApiResult<Json<HistoryResponse>> {
    let scans = state
        .store
        .scan_history(session.user_id, HISTORY_LIMIT)
        .await?;
    let summary = state.store.history_summary(session.user_id).await?;

    Ok(Json(HistoryResponse {
        scans: scans.into_iter().map(ScanResponse::from).collect(),
        summary,
    }))
}
