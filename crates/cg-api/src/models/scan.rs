//! Scan models

use crate::db::{DailyCount, LabelCount, ScanRecord};
use cg_core::analytics::HistorySummary;
use cg_core::catalog::display_name;
use cg_core::Severity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Result of analyzing one uploaded leaf photo
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub scan_id: Option<Uuid>,
    pub disease: String,
    pub display_name: String,
    pub confidence: f64,
    pub severity: Severity,
    pub severity_score: u8,
    pub description: String,
    pub treatments: Vec<String>,
    /// False when the diagnosis could not be recorded
    pub saved: bool,
    pub warning: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScanResponse {
    pub id: Uuid,
    pub disease: String,
    pub display_name: String,
    pub confidence: f64,
    pub severity: Severity,
    pub scanned_at: DateTime<Utc>,
}

impl From<ScanRecord> for ScanResponse {
    fn from(record: ScanRecord) -> Self {
        Self {
            id: record.id,
            display_name: display_name(&record.disease_name),
            disease: record.disease_name,
            confidence: record.confidence,
            severity: record.severity,
            scanned_at: record.scanned_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub scans: Vec<ScanResponse>,
    pub summary: HistorySummary,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub summary: HistorySummary,
    pub frequency: Vec<LabelCount>,
    pub daily: Vec<DailyCount>,
    pub severity: Vec<LabelCount>,
}
