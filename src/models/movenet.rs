//! MoveNet pose presets.

use crate::core::config::{ModelConfig, TransformConfig};
use crate::processors::decode::{MultiPoseDecoder, SinglePoseDecoder, TaskDecoder};
use crate::processors::types::ChannelOrder;

/// Input side of single-pose Lightning.
pub const LIGHTNING_INPUT_SIZE: u32 = 192;
/// Input side of single-pose Thunder.
pub const THUNDER_INPUT_SIZE: u32 = 256;
/// Input side used for multi-pose Lightning.
pub const MULTIPOSE_INPUT_SIZE: u32 = 256;

fn raw_nhwc(size: u32) -> Vec<TransformConfig> {
    vec![
        TransformConfig::resize(size, size),
        TransformConfig::to_tensor(ChannelOrder::HWC),
    ]
}

/// Single-pose Lightning: `[1, 192, 192, 3]` in, `[1, 1, 17, 3]` out.
pub fn single_pose_lightning() -> ModelConfig {
    ModelConfig::new(
        "movenet_singlepose_lightning",
        raw_nhwc(LIGHTNING_INPUT_SIZE),
        TaskDecoder::PoseEstimation(SinglePoseDecoder::new()),
    )
}

/// Single-pose Thunder: `[1, 256, 256, 3]` in, `[1, 1, 17, 3]` out.
pub fn single_pose_thunder() -> ModelConfig {
    ModelConfig::new(
        "movenet_singlepose_thunder",
        raw_nhwc(THUNDER_INPUT_SIZE),
        TaskDecoder::PoseEstimation(SinglePoseDecoder::new()),
    )
}

/// Multi-pose Lightning: `[1, 256, 256, 3]` in, `[1, 6, 56]` out.
pub fn multi_pose_lightning() -> ModelConfig {
    ModelConfig::new(
        "movenet_multipose_lightning",
        raw_nhwc(MULTIPOSE_INPUT_SIZE),
        TaskDecoder::MultiPoseEstimation(MultiPoseDecoder::new()),
    )
}
