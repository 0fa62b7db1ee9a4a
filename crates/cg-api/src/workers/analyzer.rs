//! Leaf photo analysis
//!
//! decode -> normalize -> diagnose -> recommend -> record. Image work and
//! inference run on the blocking pool. Recording is best effort: a store
//! failure downgrades to a warning on an otherwise complete diagnosis.

use crate::auth::Session;
use crate::db::NewScan;
use crate::error::{ApiError, ApiResult};
use crate::models::AnalysisResponse;
use crate::AppState;
use cg_core::catalog::{display_name, get_recommendation};
use cg_core::{Diagnoser, Prediction};
use std::sync::Arc;
use tracing::{info, warn};

pub const SAVE_WARNING: &str = "Diagnosis could not be saved to your history.";

/// The shared model, loaded on first use
pub async fn diagnoser(state: &Arc<AppState>) -> ApiResult<&Diagnoser> {
    state
        .model
        .get_or_try_init(|| async {
            let model_path = state.config.model_path.clone();
            let labels_path = state.config.labels_path.clone();
            info!("Loading model from {}", model_path.display());

            match tokio::task::spawn_blocking(move || Diagnoser::load(&model_path, &labels_path))
                .await
            {
                Ok(loaded) => loaded.map_err(ApiError::from),
                Err(e) => Err(ApiError::Internal(format!("model loader panicked: {}", e))),
            }
        })
        .await
}

pub async fn run_analysis(
    state: Arc<AppState>,
    session: &Session,
    image: Vec<u8>,
) -> ApiResult<AnalysisResponse> {
    let worker_state = state.clone();
    let tensor = tokio::task::spawn_blocking(move || worker_state.normalizer.decode(&image))
        .await
        .map_err(|e| ApiError::Internal(format!("preprocessing panicked: {}", e)))??;

    diagnoser(&state).await?;

    let worker_state = state.clone();
    let prediction: Prediction = tokio::task::spawn_blocking(move || {
        let model = worker_state
            .model
            .get()
            .ok_or_else(|| ApiError::Internal("model not loaded".to_string()))?;
        model.diagnose(&tensor).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("inference panicked: {}", e)))??;

    let info = get_recommendation(&prediction.label);
    let confidence = (prediction.confidence * 100.0).round() / 100.0;

    info!(
        "User {} scan: {} ({:.2}%, {})",
        session.username, prediction.label, confidence, info.severity
    );

    let saved = state
        .store
        .save_scan(NewScan {
            user_id: session.user_id,
            disease_name: prediction.label.clone(),
            confidence,
            severity: info.severity,
        })
        .await;

    let (scan_id, warning) = match saved {
        Ok(record) => (Some(record.id), None),
        Err(e) => {
            warn!("Failed to save scan for user {}: {}", session.user_id, e);
            (None, Some(SAVE_WARNING.to_string()))
        }
    };

    Ok(AnalysisResponse {
        scan_id,
        display_name: display_name(&prediction.label),
        disease: prediction.label,
        confidence,
        severity: info.severity,
        severity_score: info.severity.display_score(),
        description: info.description.to_string(),
        treatments: info.treatment.iter().map(|t| t.to_string()).collect(),
        saved: warning.is_none(),
        warning,
    })
}
