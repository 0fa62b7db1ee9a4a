//! Analytics routes

use crate::auth::Session;
use crate::db::{DAILY_WINDOW_DAYS, FREQUENCY_LIMIT};
use crate::error::ApiResult;
use crate::models::AnalyticsResponse;
use crate::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> ApiResult<Json<AnalyticsResponse>> {
    let user_id = session.user_id;

    let summary = state.store.history_summary(user_id).await?;
    let frequency = state.store.disease_frequency(user_id, FREQUENCY_LIMIT).await?;
    let daily = state.store.daily_scan_counts(user_id, DAILY_WINDOW_DAYS).await?;
    let severity = state.store.severity_breakdown(user_id).await?;

    Ok(Json(AnalyticsResponse {
        summary,
        frequency,
        daily,
        severity,
    }))
}
