//! Weather risk routes

use crate::auth::Session;
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use cg_core::weather::{assess_disease_risk, Conditions, RiskAssessment};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct WeatherQuery {
    pub city: String,
}

#[derive(Serialize)]
pub struct WeatherResponse {
    pub conditions: Conditions,
    pub risk: RiskAssessment,
}

pub async fn get_weather(
    State(state): State<Arc<AppState>>,
    _session: Session,
    Query(query): Query<WeatherQuery>,
) -> ApiResult<Json<WeatherResponse>> {
    let client = state
        .weather
        .as_ref()
        .ok_or_else(|| ApiError::Unavailable("Weather lookup is not configured.".to_string()))?;

    let conditions = client
        .current(&query.city)
        .await
        .map_err(|e| {
            tracing::warn!("Weather lookup for {} failed: {}", query.city, e);
            ApiError::Unavailable("Weather service unavailable. Try again later.".to_string())
        })?
        .ok_or_else(|| ApiError::NotFound(format!("City not found: {}", query.city.trim())))?;

    let risk = assess_disease_risk(conditions.temperature, conditions.humidity, &conditions.condition);

    Ok(Json(WeatherResponse { conditions, risk }))
}
