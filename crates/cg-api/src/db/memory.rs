//! In-process store

use super::{DailyCount, LabelCount, NewScan, ScanRecord, Store, StoreResult, User};
use async_trait::async_trait;
use cg_core::analytics::{self, HistorySummary, ScanPoint};
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    // insertion order doubles as the store's default row order
    scans: Vec<ScanRecord>,
}

/// Store backed by process memory; contents are lost on restart
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn user_scans(tables: &Tables, user_id: Uuid) -> impl Iterator<Item = &ScanRecord> {
    tables.scans.iter().filter(move |s| s.user_id == user_id)
}

fn point(scan: &ScanRecord) -> ScanPoint<'_> {
    ScanPoint {
        disease_name: &scan.disease_name,
        confidence: scan.confidence,
        severity: scan.severity,
        scanned_at: scan.scanned_at,
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.username == username || u.email == email)
        {
            return Ok(None);
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(Some(user))
    }

    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn save_scan(&self, scan: NewScan) -> StoreResult<ScanRecord> {
        let record = ScanRecord {
            id: Uuid::new_v4(),
            user_id: scan.user_id,
            disease_name: scan.disease_name,
            confidence: scan.confidence,
            severity: scan.severity,
            scanned_at: Utc::now(),
        };
        self.tables.write().await.scans.push(record.clone());
        Ok(record)
    }

    async fn scan_history(&self, user_id: Uuid, limit: i64) -> StoreResult<Vec<ScanRecord>> {
        let tables = self.tables.read().await;
        let mut scans: Vec<ScanRecord> = user_scans(&tables, user_id).cloned().collect();
        scans.sort_by(|a, b| b.scanned_at.cmp(&a.scanned_at));
        scans.truncate(limit.max(0) as usize);
        Ok(scans)
    }

    async fn history_summary(&self, user_id: Uuid) -> StoreResult<HistorySummary> {
        let tables = self.tables.read().await;
        Ok(HistorySummary::from_scans(user_scans(&tables, user_id).map(point)))
    }

    async fn disease_frequency(&self, user_id: Uuid, limit: i64) -> StoreResult<Vec<LabelCount>> {
        let tables = self.tables.read().await;
        let counts = analytics::top_n(
            user_scans(&tables, user_id).map(|s| s.disease_name.as_str()),
            limit.max(0) as usize,
        );
        Ok(counts
            .into_iter()
            .map(|(label, count)| LabelCount {
                label: label.to_string(),
                count,
            })
            .collect())
    }

    async fn daily_scan_counts(&self, user_id: Uuid, days: i32) -> StoreResult<Vec<DailyCount>> {
        let tables = self.tables.read().await;
        let counts = analytics::daily_counts(
            user_scans(&tables, user_id).map(|s| s.scanned_at),
            Utc::now(),
            i64::from(days),
        );
        Ok(counts
            .into_iter()
            .map(|(date, count)| DailyCount { date, count })
            .collect())
    }

    async fn severity_breakdown(&self, user_id: Uuid) -> StoreResult<Vec<LabelCount>> {
        let tables = self.tables.read().await;
        let counts = analytics::count_by(user_scans(&tables, user_id).map(|s| s.severity));
        Ok(counts
            .into_iter()
            .map(|(severity, count)| LabelCount {
                label: severity.to_string(),
                count,
            })
            .collect())
    }
}
