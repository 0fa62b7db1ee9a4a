//! Scan history aggregation
//!
//! In-process counterparts of the analytics queries, plus the summary
//! figures shown above the history and analytics views.

use crate::Severity;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashSet;

/// One scan as seen by the aggregations
#[derive(Debug, Clone, PartialEq)]
pub struct ScanPoint<'a> {
    pub disease_name: &'a str,
    pub confidence: f64,
    pub severity: Severity,
    pub scanned_at: DateTime<Utc>,
}

/// Headline figures for a set of scans
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistorySummary {
    pub total_scans: usize,
    pub high_risk_scans: usize,
    pub average_confidence: f64,
    pub unique_diseases: usize,
}

impl HistorySummary {
    pub fn from_scans<'a, I>(scans: I) -> Self
    where
        I: IntoIterator<Item = ScanPoint<'a>>,
    {
        let mut total = 0usize;
        let mut high_risk = 0usize;
        let mut confidence_sum = 0.0;
        let mut diseases = HashSet::new();

        for scan in scans {
            total += 1;
            if scan.severity.is_high() {
                high_risk += 1;
            }
            confidence_sum += scan.confidence;
            diseases.insert(scan.disease_name);
        }

        Self {
            total_scans: total,
            high_risk_scans: high_risk,
            average_confidence: if total == 0 {
                0.0
            } else {
                confidence_sum / total as f64
            },
            unique_diseases: diseases.len(),
        }
    }
}

/// Count occurrences of each key, most frequent first.
///
/// Equal counts keep the order in which keys were first seen.
pub fn count_by<K, I>(keys: I) -> Vec<(K, i64)>
where
    K: PartialEq,
    I: IntoIterator<Item = K>,
{
    let mut counts: Vec<(K, i64)> = Vec::new();
    for key in keys {
        match counts.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, count)) => *count += 1,
            None => counts.push((key, 1)),
        }
    }
    // stable sort keeps first-seen order among ties
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// The `limit` most frequent keys
pub fn top_n<K, I>(keys: I, limit: usize) -> Vec<(K, i64)>
where
    K: PartialEq,
    I: IntoIterator<Item = K>,
{
    let mut counts = count_by(keys);
    counts.truncate(limit);
    counts
}

/// Scans per calendar day (UTC) within the trailing window, oldest day first
pub fn daily_counts<I>(timestamps: I, now: DateTime<Utc>, days: i64) -> Vec<(NaiveDate, i64)>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let cutoff = now - Duration::days(days);
    let mut counts = count_by(
        timestamps
            .into_iter()
            .filter(|ts| *ts >= cutoff)
            .map(|ts| ts.date_naive()),
    );
    counts.sort_by_key(|(day, _)| *day);
    counts
}
