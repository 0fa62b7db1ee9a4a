//! JSON report generation

use super::DiagnosisReport;
use crate::CoreResult;

pub fn generate(report: &DiagnosisReport) -> CoreResult<String> {
    serde_json::to_string_pretty(report)
        .map_err(|e| crate::CoreError::Report(format!("JSON serialization failed: {}", e)))
}
