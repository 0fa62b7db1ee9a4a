//! Disease catalog routes

use axum::{extract::Path, Json};
use cg_core::catalog::{display_name, get_recommendation, is_known, known_labels};
use cg_core::Severity;
use serde::Serialize;

#[derive(Serialize)]
pub struct DiseaseResponse {
    pub label: String,
    pub display_name: String,
    pub known: bool,
    pub description: String,
    pub treatments: Vec<String>,
    pub severity: Severity,
    pub severity_score: u8,
}

pub async fn list_diseases() -> Json<Vec<&'static str>> {
    Json(known_labels())
}

pub async fn get_disease(Path(label): Path<String>) -> Json<DiseaseResponse> {
    let info = get_recommendation(&label);
    Json(DiseaseResponse {
        display_name: display_name(&label),
        known: is_known(&label),
        description: info.description.to_string(),
        treatments: info.treatment.iter().map(|t| t.to_string()).collect(),
        severity: info.severity,
        severity_score: info.severity.display_score(),
        label,
    })
}
