//! CropGuard API Server

mod auth;
mod db;
mod error;
mod models;
mod routes;
mod workers;

#[cfg(test)]
mod test_support;

use cg_core::weather::{WeatherClient, WeatherConfig, DEFAULT_BASE_URL};
use cg_core::{Diagnoser, ImageNormalizer};
use db::{MemoryStore, PgStore, Store};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across handlers
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Loaded once on first analysis, then shared read-only
    pub model: OnceCell<Diagnoser>,
    pub normalizer: ImageNormalizer,
    pub weather: Option<WeatherClient>,
    pub config: AppConfig,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// `memory` selects the in-process store
    pub database_url: String,
    pub max_connections: u32,
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
    pub model_path: PathBuf,
    pub labels_path: PathBuf,
    pub weather_api_key: Option<String>,
    pub weather_base_url: String,
    pub max_upload_size: usize,
    pub bind_addr: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/cropguard_db".to_string(),
            max_connections: 10,
            jwt_secret: "development-secret-change-in-production".to_string(),
            token_ttl_secs: 3600,
            model_path: PathBuf::from("models/crop_disease_model.onnx"),
            labels_path: PathBuf::from("models/class_indices.json"),
            weather_api_key: None,
            weather_base_url: DEFAULT_BASE_URL.to_string(),
            max_upload_size: 10 * 1024 * 1024, // 10MB
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={}", key, raw);
            default
        }),
        Err(_) => default,
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_url: env_or("DATABASE_URL", defaults.database_url),
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", defaults.max_connections),
            jwt_secret: env_or("JWT_SECRET", defaults.jwt_secret),
            token_ttl_secs: env_or("TOKEN_TTL_SECS", defaults.token_ttl_secs),
            model_path: env_or("MODEL_PATH", defaults.model_path),
            labels_path: env_or("LABELS_PATH", defaults.labels_path),
            weather_api_key: std::env::var("WEATHER_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            weather_base_url: env_or("WEATHER_BASE_URL", defaults.weather_base_url),
            max_upload_size: env_or("MAX_UPLOAD_SIZE", defaults.max_upload_size),
            bind_addr: env_or("BIND_ADDR", defaults.bind_addr),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "cg_api=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CropGuard API Server");

    let config = AppConfig::from_env();

    let store: Arc<dyn Store> = if config.database_url == "memory" {
        warn!("Using in-memory store; accounts and scans are lost on restart");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(PgStore::connect(&config.database_url, config.max_connections).await?)
    };

    let weather = match &config.weather_api_key {
        Some(key) => {
            let mut weather_config = WeatherConfig::new(key.clone());
            weather_config.base_url = config.weather_base_url.clone();
            Some(WeatherClient::new(weather_config)?)
        }
        None => {
            info!("WEATHER_API_KEY not set, weather lookup disabled");
            None
        }
    };

    let addr = config.bind_addr.clone();

    // Create shared state
    let state = Arc::new(AppState {
        store,
        model: OnceCell::new(),
        normalizer: ImageNormalizer::default(),
        weather,
        config,
    });

    let app = routes::router(state);

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
