//! ONNX Runtime classifier backend

use super::Classifier;
use crate::{CoreError, CoreResult, Tensor};
use ort::session::Session;
use std::path::Path;
use std::sync::Mutex;

/// Classifier backed by an ONNX export of the trained model
pub struct OnnxClassifier {
    // Session::run needs exclusive access
    session: Mutex<Session>,
}

impl OnnxClassifier {
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::Model(format!(
                "model file not found: {}",
                path.display()
            )));
        }

        let session = Session::builder()
            .and_then(|builder| builder.commit_from_file(path))
            .map_err(|e| CoreError::Model(format!("{}: {}", path.display(), e)))?;

        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, input: &Tensor) -> CoreResult<Vec<f32>> {
        let value = ort::value::Tensor::from_array((input.shape(), input.data().to_vec()))
            .map_err(|e| CoreError::Inference(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| CoreError::Inference("model session poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![value])
            .map_err(|e| CoreError::Inference(e.to_string()))?;

        let (_shape, scores) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| CoreError::Inference(e.to_string()))?;

        Ok(scores.to_vec())
    }

    fn name(&self) -> &str {
        "onnx"
    }
}
