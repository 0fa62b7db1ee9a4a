//! Diagnosis report generation

pub mod json;
pub mod markdown;

use crate::{CoreError, CoreResult, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything a downloadable diagnosis report shows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisReport {
    pub username: String,
    pub disease_name: String,
    pub confidence: f64,
    pub severity: Severity,
    pub description: String,
    pub treatments: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Markdown,
    Html,
}

impl ReportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Json => "application/json",
            ReportFormat::Markdown => "text/markdown; charset=utf-8",
            ReportFormat::Html => "text/html; charset=utf-8",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Markdown => "md",
            ReportFormat::Html => "html",
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "html" => Ok(ReportFormat::Html),
            other => Err(CoreError::Report(format!("unsupported report format: {}", other))),
        }
    }
}

/// Generate report in specified format
pub fn generate_report(report: &DiagnosisReport, format: ReportFormat) -> CoreResult<String> {
    match format {
        ReportFormat::Json => json::generate(report),
        ReportFormat::Markdown => markdown::generate(report),
        ReportFormat::Html => markdown::generate_html(report),
    }
}

/// Download name, e.g. `CropGuard_Report_Tomato_Early_Blight.md`
pub fn report_filename(disease_name: &str, format: ReportFormat) -> String {
    let stem: String = disease_name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("CropGuard_Report_{}.{}", stem, format.extension())
}
