//! API routes

pub mod analytics;
pub mod auth;
pub mod diseases;
pub mod reports;
pub mod scans;
pub mod weather;

use crate::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub fn router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.max_upload_size;

    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Authentication
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))

        // Scans
        .route(
            "/api/scans",
            post(scans::create_scan)
                .layer(DefaultBodyLimit::max(upload_limit))
                .get(scans::list_scans),
        )
        .route("/api/analytics", get(analytics::get_analytics))

        // Reference data
        .route("/api/diseases", get(diseases::list_diseases))
        .route("/api/diseases/:label", get(diseases::get_disease))

        // Reports
        .route("/api/reports", post(reports::download_report))

        // Weather
        .route("/api/weather", get(weather::get_weather))

        // CORS
        .layer(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any))

        // Tracing
        .layer(TraceLayer::new_for_http())

        // State
        .with_state(state)
}
