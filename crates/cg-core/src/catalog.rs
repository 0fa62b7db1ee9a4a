//! Disease catalog and treatment recommendations

use crate::Severity;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Static reference data for one disease label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiseaseInfo {
    pub description: &'static str,
    pub treatment: &'static [&'static str],
    pub severity: Severity,
}

/// Returned for labels the catalog does not know
pub static UNRECOGNIZED: DiseaseInfo = DiseaseInfo {
    description: "Disease not recognized.",
    treatment: &["Consult an expert agriculturalist."],
    severity: Severity::Unknown,
};

static CATALOG: Lazy<HashMap<&'static str, DiseaseInfo>> = Lazy::new(|| {
    HashMap::from([
        (
            "Tomato_Early_Blight",
            DiseaseInfo {
                description: "Early blight involves concentric rings on lower leaves, turning yellow and dropping off.",
                treatment: &[
                    "Use Mancozeb or Chlorothalonil fungicide.",
                    "Improve air circulation between plants.",
                    "Remove and destroy infected leaves immediately.",
                    "Water at the base of the plant, not overhead.",
                ],
                severity: Severity::Moderate,
            },
        ),
        (
            "Tomato_Late_Blight",
            DiseaseInfo {
                description: "Late blight causes dark, water-soaked spots on leaves and white fungal growth on undersides.",
                treatment: &[
                    "Apply copper-based fungicides.",
                    "Destroy all infected plants immediately to prevent spread.",
                    "Keep foliage dry; avoid overhead irrigation.",
                ],
                severity: Severity::High,
            },
        ),
        (
            "Tomato_Healthy",
            DiseaseInfo {
                description: "The plant appears healthy with no visible signs of disease.",
                treatment: &[
                    "Continue regular watering and fertilization.",
                    "Monitor regularly for any signs of pests or diseases.",
                ],
                severity: Severity::None,
            },
        ),
        (
            "Potato_Early_Blight",
            DiseaseInfo {
                description: "Brown spots with concentric rings on older leaves.",
                treatment: &[
                    "Apply fungicides like Mancozeb.",
                    "Practice crop rotation.",
                    "Ensure proper nitrogen fertilization.",
                ],
                severity: Severity::Moderate,
            },
        ),
        (
            "Potato_Late_Blight",
            DiseaseInfo {
                description: "Rapidly spreading dark lesions on leaves and stems.",
                treatment: &[
                    "Apply fungicides immediately.",
                    "Destroy infected tubers.",
                    "Ensure good drainage.",
                ],
                severity: Severity::High,
            },
        ),
        (
            "Potato_Healthy",
            DiseaseInfo {
                description: "No disease detected.",
                treatment: &["Maintain good agricultural practices."],
                severity: Severity::None,
            },
        ),
    ])
});

/// Look up a label, falling back to [`UNRECOGNIZED`]
pub fn get_recommendation(label: &str) -> &'static DiseaseInfo {
    CATALOG.get(label).unwrap_or(&UNRECOGNIZED)
}

pub fn is_known(label: &str) -> bool {
    CATALOG.contains_key(label)
}

/// All catalog labels in alphabetical order
pub fn known_labels() -> Vec<&'static str> {
    let mut labels: Vec<&'static str> = CATALOG.keys().copied().collect();
    labels.sort_unstable();
    labels
}

/// Human readable form of a label: `Tomato_Early_Blight` -> `Tomato Early Blight`
pub fn display_name(label: &str) -> String {
    label.replace('_', " ")
}
