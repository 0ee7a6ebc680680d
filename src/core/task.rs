//! Task families supported by the crate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the kind of vision task a model performs.
///
/// The set is closed: each variant has exactly one decoder family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Image classification with label ranking
    Classification,
    /// SSD-style object detection
    ObjectDetection,
    /// Single-person pose estimation
    PoseEstimation,
    /// Multi-person pose estimation
    MultiPoseEstimation,
    /// Dense facial landmark detection
    LandmarkDetection,
}

impl TaskType {
    /// Returns a human-readable name for the task type.
    pub fn name(&self) -> &'static str {
        match self {
            TaskType::Classification => "classification",
            TaskType::ObjectDetection => "object_detection",
            TaskType::PoseEstimation => "pose_estimation",
            TaskType::MultiPoseEstimation => "multi_pose_estimation",
            TaskType::LandmarkDetection => "landmark_detection",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
