//! Whole-model configuration: preprocessing plus decoder.

use crate::core::config::onnx::OrtSessionConfig;
use crate::core::config::transform::TransformConfig;
use crate::core::errors::VisionResult;
use crate::core::task::TaskType;
use crate::processors::decode::{Decoder, TaskDecoder};
use crate::processors::preprocess::Preprocessor;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything needed to drive one model, apart from its weights.
///
/// ```json
/// {
///   "model_name": "face_alignment_2d106",
///   "preprocessing": [
///     {"type": "resize", "width": 192, "height": 192},
///     {"type": "to_tensor", "order": "CHW"}
///   ],
///   "decoder": {"task": "landmark_detection", "num_points": 106}
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Human-readable model name.
    pub model_name: String,
    /// Ordered preprocessing stages.
    pub preprocessing: Vec<TransformConfig>,
    /// Output decoder.
    pub decoder: TaskDecoder,
    /// ONNX Runtime session options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<OrtSessionConfig>,
}

impl ModelConfig {
    /// Creates a configuration without session options.
    pub fn new(
        model_name: impl Into<String>,
        preprocessing: Vec<TransformConfig>,
        decoder: TaskDecoder,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            preprocessing,
            decoder,
            session: None,
        }
    }

    /// Sets the ONNX Runtime session options.
    pub fn with_session(mut self, session: OrtSessionConfig) -> Self {
        self.session = Some(session);
        self
    }

    /// Task family of the decoder.
    pub fn task_type(&self) -> TaskType {
        self.decoder.task_type()
    }

    /// Builds the preprocessing operation.
    pub fn build_preprocessor(&self) -> VisionResult<Preprocessor> {
        Preprocessor::from_configs(&self.preprocessing)
    }

    /// Checks that the preprocessing list composes and the decoder parameters are sane.
    pub fn validate(&self) -> VisionResult<()> {
        self.build_preprocessor()?;
        self.decoder.validate()
    }

    /// Parses a configuration from JSON.
    pub fn from_json_str(json: &str) -> VisionResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> VisionResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> VisionResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the configuration to a JSON file.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> VisionResult<()> {
        std::fs::write(path.as_ref(), self.to_json_string()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_documented_example() {
        let config = ModelConfig::from_json_str(
            r#"{
                "model_name": "face_alignment_2d106",
                "preprocessing": [
                    {"type": "resize", "width": 192, "height": 192},
                    {"type": "to_tensor", "order": "CHW"}
                ],
                "decoder": {"task": "landmark_detection", "num_points": 106}
            }"#,
        )
        .unwrap();
        assert_eq!(config.task_type(), TaskType::LandmarkDetection);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_preprocessing_fails_validation() {
        let config = ModelConfig::from_json_str(
            r#"{
                "model_name": "broken",
                "preprocessing": [{"type": "rescale"}],
                "decoder": {"task": "pose_estimation"}
            }"#,
        )
        .unwrap();
        assert!(config.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn test_malformed_json() {
        assert!(ModelConfig::from_json_str("{").is_err());
    }
}
