//! Report download routes

use crate::auth::Session;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::Query,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use cg_core::catalog::{display_name, get_recommendation};
use cg_core::report::{generate_report, report_filename, DiagnosisReport, ReportFormat};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct ReportQuery {
    pub format: Option<String>,
}

/// Diagnosis fields the report is built from
#[derive(Deserialize)]
pub struct ReportRequest {
    pub disease: String,
    pub confidence: f64,
}

pub async fn download_report(
    session: Session,
    Query(query): Query<ReportQuery>,
    Json(payload): Json<ReportRequest>,
) -> ApiResult<Response> {
    let format: ReportFormat = query
        .format
        .as_deref()
        .unwrap_or("markdown")
        .parse()
        .map_err(|e: cg_core::CoreError| ApiError::BadRequest(e.to_string()))?;

    let info = get_recommendation(&payload.disease);
    let disease_name = display_name(&payload.disease);

    let report = DiagnosisReport {
        username: session.username,
        disease_name: disease_name.clone(),
        confidence: payload.confidence,
        severity: info.severity,
        description: info.description.to_string(),
        treatments: info.treatment.iter().map(|t| t.to_string()).collect(),
        generated_at: chrono::Utc::now(),
    };

    let content = generate_report(&report, format).map_err(|e| {
        tracing::warn!("Report generation failed: {}", e);
        ApiError::Internal(format!("Could not generate report: {}", e))
    })?;

    let filename = report_filename(&disease_name, format);

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        content,
    )
        .into_response())
}
