//! Markdown and HTML report generation

use super::DiagnosisReport;
use crate::CoreResult;
use std::fmt::Write;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

pub fn generate(report: &DiagnosisReport) -> CoreResult<String> {
    let mut out = String::new();
    render_markdown(&mut out, report).map_err(fmt_error)?;
    Ok(out)
}

fn render_markdown(out: &mut String, report: &DiagnosisReport) -> std::fmt::Result {
    writeln!(out, "# CropGuard AI Diagnosis Report")?;
    writeln!(out)?;
    writeln!(out, "**Prepared for:** {}", report.username)?;
    writeln!(out, "**Generated:** {}", report.generated_at.format(DATE_FORMAT))?;
    writeln!(out)?;
    writeln!(out, "## Diagnosis")?;
    writeln!(out)?;
    writeln!(out, "| Field | Value |")?;
    writeln!(out, "|---|---|")?;
    writeln!(out, "| Detected Disease | {} |", report.disease_name)?;
    writeln!(out, "| Confidence | {:.1}% |", report.confidence)?;
    writeln!(out, "| Severity | {} |", report.severity)?;
    writeln!(out)?;
    writeln!(out, "## About This Disease")?;
    writeln!(out)?;
    writeln!(out, "{}", report.description)?;
    writeln!(out)?;
    writeln!(out, "## Treatment Recommendations")?;
    writeln!(out)?;
    for (i, treatment) in report.treatments.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, treatment)?;
    }
    Ok(())
}

pub fn generate_html(report: &DiagnosisReport) -> CoreResult<String> {
    let mut out = String::new();
    render_html(&mut out, report).map_err(fmt_error)?;
    Ok(out)
}

fn render_html(out: &mut String, report: &DiagnosisReport) -> std::fmt::Result {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html><head><meta charset=\"utf-8\">")?;
    writeln!(out, "<title>CropGuard AI Report - {}</title>", escape(&report.disease_name))?;
    writeln!(out, "</head><body>")?;
    writeln!(out, "<h1>CropGuard AI Diagnosis Report</h1>")?;
    writeln!(
        out,
        "<p>Prepared for <strong>{}</strong> on {}</p>",
        escape(&report.username),
        report.generated_at.format(DATE_FORMAT)
    )?;
    writeln!(out, "<table>")?;
    writeln!(out, "<tr><th>Detected Disease</th><td>{}</td></tr>", escape(&report.disease_name))?;
    writeln!(out, "<tr><th>Confidence</th><td>{:.1}%</td></tr>", report.confidence)?;
    writeln!(
        out,
        "<tr><th>Severity</th><td>{} (score {})</td></tr>",
        report.severity,
        report.severity.display_score()
    )?;
    writeln!(out, "</table>")?;
    writeln!(out, "<h2>About This Disease</h2>")?;
    writeln!(out, "<p>{}</p>", escape(&report.description))?;
    writeln!(out, "<h2>Treatment Recommendations</h2>")?;
    writeln!(out, "<ol>")?;
    for treatment in &report.treatments {
        writeln!(out, "<li>{}</li>", escape(treatment))?;
    }
    writeln!(out, "</ol>")?;
    writeln!(out, "</body></html>")?;
    Ok(())
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn fmt_error(e: std::fmt::Error) -> crate::CoreError {
    crate::CoreError::Report(format!("rendering failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Severity;
    use chrono::TimeZone;

    fn sample() -> DiagnosisReport {
        DiagnosisReport {
            username: "<script>".to_string(),
            disease_name: "Tomato Early Blight".to_string(),
            confidence: 91.234,
            severity: Severity::Moderate,
            description: "Concentric rings & yellowing.".to_string(),
            treatments: vec![
                "Use Mancozeb or Chlorothalonil fungicide.".to_string(),
                "Improve air circulation between plants.".to_string(),
            ],
            generated_at: chrono::Utc.with_ymd_and_hms(2026, 5, 1, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_markdown_report() {
        let text = generate(&sample()).unwrap();
        assert!(text.contains("| Detected Disease | Tomato Early Blight |"));
        assert!(text.contains("| Confidence | 91.2% |"));
        assert!(text.contains("| Severity | Moderate |"));
        assert!(text.contains("2. Improve air circulation between plants."));
        assert!(text.contains("2026-05-01 09:30 UTC"));
    }

    #[test]
    fn test_html_escapes_user_text() {
        let html = generate_html(&sample()).unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("Concentric rings &amp; yellowing."));
        assert!(html.contains("Moderate (score 50)"));
    }
}
