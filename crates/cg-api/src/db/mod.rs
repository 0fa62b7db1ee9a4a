//! Persistence layer
//!
//! Handlers talk to a [`Store`]; `PgStore` is the production backend and
//! `MemoryStore` keeps everything in process for local runs and tests.

pub mod memory;
pub mod postgres;
pub mod schema;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use schema::*;

use async_trait::async_trait;
use cg_core::analytics::HistorySummary;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Most recent scans shown in history
pub const HISTORY_LIMIT: i64 = 20;
/// Diseases shown in the frequency chart
pub const FREQUENCY_LIMIT: i64 = 10;
/// Trailing window of the daily activity chart
pub const DAILY_WINDOW_DAYS: i32 = 30;

#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a user; `None` when the username or email is already taken
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> StoreResult<Option<User>>;

    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    async fn save_scan(&self, scan: NewScan) -> StoreResult<ScanRecord>;

    /// Newest first
    async fn scan_history(&self, user_id: Uuid, limit: i64) -> StoreResult<Vec<ScanRecord>>;

    async fn history_summary(&self, user_id: Uuid) -> StoreResult<HistorySummary>;

    /// Most frequent diseases first
    async fn disease_frequency(&self, user_id: Uuid, limit: i64) -> StoreResult<Vec<LabelCount>>;

    /// Oldest day first
    async fn daily_scan_counts(&self, user_id: Uuid, days: i32) -> StoreResult<Vec<DailyCount>>;

    /// Largest tier first
    async fn severity_breakdown(&self, user_id: Uuid) -> StoreResult<Vec<LabelCount>>;
}
