//! Classifier adapter
//!
//! Wraps the pretrained model behind the [`Classifier`] trait and maps its
//! output index back to a disease label through the label-mapping artifact.

#[cfg(feature = "onnx")]
pub mod onnx;

use crate::{CoreError, CoreResult, Tensor};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// A pretrained image classifier producing one probability per class
pub trait Classifier: Send + Sync {
    /// Run a single inference on a normalized (1, H, W, 3) tensor
    fn predict(&self, input: &Tensor) -> CoreResult<Vec<f32>>;

    /// Backend name for logging
    fn name(&self) -> &str {
        "classifier"
    }
}

/// Index to label mapping, inverted from the `{"label": index}` document
#[derive(Debug, Clone, Default)]
pub struct LabelMap {
    labels: BTreeMap<usize, String>,
}

impl LabelMap {
    /// Load the mapping from a JSON file on disk
    pub fn load(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> CoreResult<Self> {
        let indices: BTreeMap<String, usize> = serde_json::from_str(text)
            .map_err(|e| CoreError::Parse(format!("label mapping: {}", e)))?;

        let mut labels = BTreeMap::new();
        for (label, index) in indices {
            if let Some(existing) = labels.insert(index, label.clone()) {
                return Err(CoreError::Config(format!(
                    "class index {} is assigned to both {} and {}",
                    index, existing, label
                )));
            }
        }

        Ok(Self { labels })
    }

    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).enumerate().collect(),
        }
    }

    pub fn label(&self, index: usize) -> CoreResult<&str> {
        self.labels
            .get(&index)
            .map(String::as_str)
            .ok_or(CoreError::LabelMapping(index))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Outcome of one classification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub index: usize,
    pub label: String,
    /// Maximum class probability as a percentage
    pub confidence: f64,
}

/// Index and value of the largest element. The first maximum wins; NaN never does.
pub fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((index, value)),
        }
    }
    best
}

/// A loaded model together with its label mapping
pub struct Diagnoser {
    classifier: Box<dyn Classifier>,
    labels: LabelMap,
}

impl Diagnoser {
    pub fn new(classifier: Box<dyn Classifier>, labels: LabelMap) -> Self {
        Self { classifier, labels }
    }

    /// Load the model and label artifacts from disk
    pub fn load(model_path: &Path, labels_path: &Path) -> CoreResult<Self> {
        let labels = LabelMap::load(labels_path)?;
        let classifier = load_classifier(model_path)?;
        tracing::info!(
            "Loaded {} model with {} classes",
            classifier.name(),
            labels.len()
        );
        Ok(Self::new(classifier, labels))
    }

    pub fn diagnose(&self, input: &Tensor) -> CoreResult<Prediction> {
        let probabilities = self.classifier.predict(input)?;
        let (index, probability) = argmax(&probabilities)
            .ok_or_else(|| CoreError::Inference("model produced no class scores".to_string()))?;
        let label = self.labels.label(index)?.to_string();

        Ok(Prediction {
            index,
            label,
            confidence: f64::from(probability) * 100.0,
        })
    }
}

/// Open the model artifact with the compiled-in backend
#[cfg(feature = "onnx")]
pub fn load_classifier(model_path: &Path) -> CoreResult<Box<dyn Classifier>> {
    Ok(Box::new(onnx::OnnxClassifier::load(model_path)?))
}

#[cfg(not(feature = "onnx"))]
pub fn load_classifier(model_path: &Path) -> CoreResult<Box<dyn Classifier>> {
    Err(CoreError::Config(format!(
        "cannot load {}: built without the `onnx` feature",
        model_path.display()
    )))
}
