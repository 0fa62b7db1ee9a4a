//! CropGuard Core Diagnosis Engine
//!
//! This crate provides the pieces behind a crop leaf diagnosis: turning an
//! uploaded photo into a model input tensor, interpreting classifier output,
//! looking up treatment advice, and the supporting credential, analytics,
//! weather and report utilities used by the API server and CLI.

pub mod analytics;
pub mod catalog;
pub mod classifier;
pub mod credentials;
pub mod preprocess;
pub mod report;
pub mod weather;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use catalog::{get_recommendation, DiseaseInfo};
pub use classifier::{Classifier, Diagnoser, LabelMap, Prediction};
pub use preprocess::{ImageNormalizer, Tensor};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Label mapping has no entry for class index {0}")]
    LabelMapping(usize),

    #[error("Weather error: {0}")]
    Weather(String),

    #[error("Report error: {0}")]
    Report(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Coarse risk tier attached to a diagnosed disease
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    None,
    Low,
    Moderate,
    High,
    Unknown,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::None,
        Severity::Low,
        Severity::Moderate,
        Severity::High,
        Severity::Unknown,
    ];

    /// Score shown on the severity progress indicator
    pub fn display_score(&self) -> u8 {
        match self {
            Severity::None => 0,
            Severity::Low => 25,
            Severity::Moderate => 50,
            Severity::High => 85,
            Severity::Unknown => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "None",
            Severity::Low => "Low",
            Severity::Moderate => "Moderate",
            Severity::High => "High",
            Severity::Unknown => "Unknown",
        }
    }

    pub fn is_high(&self) -> bool {
        matches!(self, Severity::High)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = std::convert::Infallible;

    /// Stored tiers that no longer match a known name read back as `Unknown`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "None" => Severity::None,
            "Low" => Severity::Low,
            "Moderate" => Severity::Moderate,
            "High" => Severity::High,
            _ => Severity::Unknown,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_scores() {
        assert_eq!(Severity::High.display_score(), 85);
        assert_eq!(Severity::Moderate.display_score(), 50);
        assert_eq!(Severity::Low.display_score(), 25);
        assert_eq!(Severity::None.display_score(), 0);
        assert_eq!(Severity::Unknown.display_score(), 0);
    }

    #[test]
    fn test_severity_text_roundtrip() {
        for severity in Severity::ALL {
            let parsed: Severity = severity.to_string().parse().unwrap();
            assert_eq!(parsed, severity);
        }
        assert_eq!("Critical".parse::<Severity>().unwrap(), Severity::Unknown);
    }

    #[test]
    fn test_severity_serde_uses_tier_name() {
        let json = serde_json::to_string(&Severity::Moderate).unwrap();
        assert_eq!(json, "\"Moderate\"");
    }
}
