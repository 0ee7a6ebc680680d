//! Domain-level value types.
//!
//! Inputs ([`ImageFrame`], [`ImageSource`]), label tables and the structured
//! results produced by the decoders. All of them are plain values with no
//! shared mutability.

pub mod detection;
pub mod image;
pub mod labels;
pub mod landmark;
pub mod pose;

pub use detection::DetectedObject;
pub use image::{ColorMode, ImageFrame, ImageSource};
pub use labels::LabelMap;
pub use landmark::{Classification, Landmark};
pub use pose::{
    DetectedPose, Keypoint, MultiPoseDetectionResult, POSE_EDGES, PoseEdge, PoseLandmark,
};
