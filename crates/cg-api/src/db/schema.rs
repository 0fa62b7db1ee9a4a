//! Database schema types

use cg_core::Severity;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub disease_name: String,
    pub confidence: f64,
    pub severity: Severity,
    pub scanned_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for ScanRecord {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let severity: String = row.try_get("severity")?;
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            disease_name: row.try_get("disease_name")?,
            confidence: row.try_get("confidence")?,
            severity: severity.parse().unwrap_or(Severity::Unknown),
            scanned_at: row.try_get("scanned_at")?,
        })
    }
}

/// Input for one scan row
#[derive(Debug, Clone)]
pub struct NewScan {
    pub user_id: Uuid,
    pub disease_name: String,
    pub confidence: f64,
    pub severity: Severity,
}

/// A grouped count keyed by a text column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: i64,
}
