//! Shared fixtures for handler tests

use crate::db::{
    DailyCount, LabelCount, MemoryStore, NewScan, ScanRecord, Store, StoreError, StoreResult, User,
};
use crate::{AppConfig, AppState};
use async_trait::async_trait;
use cg_core::analytics::HistorySummary;
use cg_core::weather::{WeatherClient, WeatherConfig};
use cg_core::{Classifier, CoreResult, Diagnoser, ImageNormalizer, LabelMap, Tensor};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::sync::Arc;
use tokio::sync::OnceCell;
use uuid::Uuid;

pub const LABELS: [&str; 3] = ["Tomato_Early_Blight", "Tomato_Healthy", "Tomato_Late_Blight"];
pub const BOUNDARY: &str = "cropguard-test-boundary";

/// Returns the same scores for every input
pub struct StubClassifier(pub Vec<f32>);

impl Classifier for StubClassifier {
    fn predict(&self, input: &Tensor) -> CoreResult<Vec<f32>> {
        assert_eq!(input.shape(), [1, 224, 224, 3]);
        Ok(self.0.clone())
    }
}

/// Store whose every call fails
pub struct FailingStore;

fn down<T>() -> StoreResult<T> {
    Err(StoreError::Database(sqlx::Error::PoolTimedOut))
}

#[async_trait]
impl Store for FailingStore {
    async fn create_user(&self, _: &str, _: &str, _: &str) -> StoreResult<Option<User>> {
        down()
    }
    async fn user_by_username(&self, _: &str) -> StoreResult<Option<User>> {
        down()
    }
    async fn save_scan(&self, _: NewScan) -> StoreResult<ScanRecord> {
        down()
    }
    async fn scan_history(&self, _: Uuid, _: i64) -> StoreResult<Vec<ScanRecord>> {
        down()
    }
    async fn history_summary(&self, _: Uuid) -> StoreResult<HistorySummary> {
        down()
    }
    async fn disease_frequency(&self, _: Uuid, _: i64) -> StoreResult<Vec<LabelCount>> {
        down()
    }
    async fn daily_scan_counts(&self, _: Uuid, _: i32) -> StoreResult<Vec<DailyCount>> {
        down()
    }
    async fn severity_breakdown(&self, _: Uuid) -> StoreResult<Vec<LabelCount>> {
        down()
    }
}

/// State with an in-memory store and no model loaded yet
pub fn unloaded_state() -> AppState {
    AppState {
        store: Arc::new(MemoryStore::new()),
        model: OnceCell::new(),
        normalizer: ImageNormalizer::default(),
        weather: None,
        config: AppConfig {
            jwt_secret: "test-secret".to_string(),
            ..AppConfig::default()
        },
    }
}

/// State whose model is already loaded and returns `scores`
pub fn app_state(store: Arc<dyn Store>, scores: Vec<f32>) -> AppState {
    let diagnoser = Diagnoser::new(
        Box::new(StubClassifier(scores)),
        LabelMap::from_labels(LABELS),
    );

    AppState {
        store,
        model: OnceCell::new_with(Some(diagnoser)),
        ..unloaded_state()
    }
}

pub fn state_with(store: Arc<dyn Store>, scores: Vec<f32>) -> Arc<AppState> {
    Arc::new(app_state(store, scores))
}

/// State whose weather client talks to `base_url`
pub fn weather_state(base_url: String) -> Arc<AppState> {
    let mut config = WeatherConfig::new("test-key");
    config.base_url = base_url;

    let mut state = app_state(Arc::new(MemoryStore::new()), vec![1.0]);
    state.weather = Some(WeatherClient::new(config).expect("weather client"));
    Arc::new(state)
}

pub fn memory_state(scores: Vec<f32>) -> Arc<AppState> {
    state_with(Arc::new(MemoryStore::new()), scores)
}

pub fn white_png() -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(100, 100, Rgb([255, 255, 255])));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("encode png");
    buf
}

/// A multipart body with a single `file` field
pub fn multipart_body(bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"file\"; filename=\"leaf.png\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}
