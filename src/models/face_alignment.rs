//! 2D106 face alignment preset.

use crate::core::config::{ModelConfig, TransformConfig};
use crate::core::constants::DEFAULT_LANDMARK_POINTS;
use crate::processors::decode::{LandmarkDecoder, TaskDecoder};
use crate::processors::types::ChannelOrder;

/// Input side of the 2D106 model.
pub const FACE_ALIGNMENT_INPUT_SIZE: u32 = 192;

/// 106-point face alignment: an aligned face crop in, `[1, 212]` out.
///
/// The network takes raw `[0, 255]` RGB planes and emits points in `[-1, 1]`.
pub fn face_alignment_2d106() -> ModelConfig {
    ModelConfig::new(
        "face_alignment_2d106",
        vec![
            TransformConfig::resize(FACE_ALIGNMENT_INPUT_SIZE, FACE_ALIGNMENT_INPUT_SIZE),
            TransformConfig::to_tensor(ChannelOrder::CHW),
        ],
        TaskDecoder::LandmarkDetection(
            LandmarkDecoder::new(DEFAULT_LANDMARK_POINTS).with_output_name("fc1"),
        ),
    )
}
