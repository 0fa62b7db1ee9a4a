//! PostgreSQL store

use super::{DailyCount, LabelCount, NewScan, ScanRecord, Store, StoreResult, User};
use async_trait::async_trait;
use cg_core::analytics::HistorySummary;
use chrono::NaiveDate;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;
use uuid::Uuid;

const SCAN_COLUMNS: &str = "id, user_id, disease_name, confidence, severity, scanned_at";
const USER_COLUMNS: &str = "id, username, email, password_hash, created_at";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and bring the schema up to date
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        info!("Connected to database");

        sqlx::migrate!("./migrations").run(&pool).await?;

        info!("Database migrations complete");

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> StoreResult<Option<User>> {
        let result = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, username, email, password_hash, created_at) \
             VALUES ($1, $2, $3, $4, NOW()) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(Some(user)),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn save_scan(&self, scan: NewScan) -> StoreResult<ScanRecord> {
        let record = sqlx::query_as::<_, ScanRecord>(&format!(
            "INSERT INTO scan_history (id, user_id, disease_name, confidence, severity, scanned_at) \
             VALUES ($1, $2, $3, $4, $5, NOW()) RETURNING {}",
            SCAN_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(scan.user_id)
        .bind(&scan.disease_name)
        .bind(scan.confidence)
        .bind(scan.severity.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    async fn scan_history(&self, user_id: Uuid, limit: i64) -> StoreResult<Vec<ScanRecord>> {
        let rows = sqlx::query_as::<_, ScanRecord>(&format!(
            "SELECT {} FROM scan_history WHERE user_id = $1 \
             ORDER BY scanned_at DESC LIMIT $2",
            SCAN_COLUMNS
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn history_summary(&self, user_id: Uuid) -> StoreResult<HistorySummary> {
        let (total, high_risk, average, unique): (i64, i64, f64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE severity = 'High'),
                   COALESCE(AVG(confidence), 0)::DOUBLE PRECISION,
                   COUNT(DISTINCT disease_name)
            FROM scan_history WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(HistorySummary {
            total_scans: total as usize,
            high_risk_scans: high_risk as usize,
            average_confidence: average,
            unique_diseases: unique as usize,
        })
    }

    async fn disease_frequency(&self, user_id: Uuid, limit: i64) -> StoreResult<Vec<LabelCount>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT disease_name, COUNT(*) AS count
            FROM scan_history WHERE user_id = $1
            GROUP BY disease_name ORDER BY count DESC LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(label, count)| LabelCount { label, count })
            .collect())
    }

    async fn daily_scan_counts(&self, user_id: Uuid, days: i32) -> StoreResult<Vec<DailyCount>> {
        let rows: Vec<(NaiveDate, i64)> = sqlx::query_as(
            r#"
            SELECT (scanned_at AT TIME ZONE 'UTC')::DATE AS scan_date, COUNT(*) AS count
            FROM scan_history
            WHERE user_id = $1 AND scanned_at >= NOW() - ($2::INT * INTERVAL '1 day')
            GROUP BY scan_date ORDER BY scan_date
            "#,
        )
        .bind(user_id)
        .bind(days)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(date, count)| DailyCount { date, count })
            .collect())
    }

    async fn severity_breakdown(&self, user_id: Uuid) -> StoreResult<Vec<LabelCount>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT severity, COUNT(*) AS count
            FROM scan_history WHERE user_id = $1
            GROUP BY severity ORDER BY count DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(label, count)| LabelCount { label, count })
            .collect())
    }
}
