//! Ready-made model configurations.
//!
//! Presets carry only configuration: preprocessing stages and a decoder.
//! Weights are resolved by the caller and handed to an engine.

pub mod face_alignment;
pub mod imagenet;
pub mod movenet;
pub mod ssd;

pub use face_alignment::face_alignment_2d106;
pub use imagenet::{InputType, classifier};
pub use movenet::{multi_pose_lightning, single_pose_lightning, single_pose_thunder};
pub use ssd::{ssd_mobilenet_v1, ssd_mobilenet_v1_tflite};

use crate::core::config::ModelConfig;
use crate::core::errors::{VisionError, VisionResult};

/// Preset names accepted by [`preset`].
pub const SUPPORTED_MODELS: &[&str] = &[
    "ssd_mobilenet_v1",
    "ssd_mobilenet_v1_tflite",
    "movenet_singlepose_lightning",
    "movenet_singlepose_thunder",
    "movenet_multipose_lightning",
    "face_alignment_2d106",
];

/// Looks up a preset by name. Dashes and case are ignored.
///
/// Classification presets need a label table and are built with
/// [`imagenet::classifier`] instead.
pub fn preset(model_name: &str) -> VisionResult<ModelConfig> {
    let normalized = model_name.to_lowercase().replace('-', "_");
    let config = match normalized.as_str() {
        "ssd_mobilenet_v1" => ssd_mobilenet_v1(),
        "ssd_mobilenet_v1_tflite" => ssd_mobilenet_v1_tflite(),
        "movenet_singlepose_lightning" => single_pose_lightning(),
        "movenet_singlepose_thunder" => single_pose_thunder(),
        "movenet_multipose_lightning" => multi_pose_lightning(),
        "face_alignment_2d106" => face_alignment_2d106(),
        _ => {
            return Err(VisionError::ConfigError {
                message: format!(
                    "Unknown model name: '{}'. Supported models: {}",
                    model_name,
                    SUPPORTED_MODELS.join(", ")
                ),
            });
        }
    };
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_supported_name_resolves_and_validates() {
        for name in SUPPORTED_MODELS {
            let config = preset(name).unwrap();
            assert_eq!(&config.model_name, name);
            assert!(config.validate().is_ok(), "{name} failed validation");
        }
    }

    #[test]
    fn test_name_normalization() {
        assert!(preset("MoveNet-SinglePose-Lightning").is_ok());
        assert!(preset("yolo").unwrap_err().is_configuration());
    }
}
