//! Post-processing decoders.
//!
//! A decoder turns the raw named tensors returned by the execution engine into
//! a structured, task-specific result. Decoders are plain configuration: they
//! hold no caches and take `&self`, so one instance can decode from many
//! threads at once.
//!
//! The supported task families form a closed set, reflected by
//! [`TaskDecoder`] and its output [`Prediction`].

pub mod classification;
pub mod landmark;
pub mod pose;
pub mod ssd;

pub use classification::ClassificationDecoder;
pub use landmark::LandmarkDecoder;
pub use pose::{MultiPoseDecoder, SinglePoseDecoder};
pub use ssd::{DetectionOptions, SsdDecoder, SsdModelMetadata};

use crate::core::errors::{VisionError, VisionResult};
use crate::core::task::TaskType;
use crate::core::tensor::{OutputTensors, flat_values};
use crate::domain::detection::DetectedObject;
use crate::domain::landmark::{Classification, Landmark};
use crate::domain::pose::{DetectedPose, MultiPoseDetectionResult};
use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Turns raw engine outputs into a task result.
pub trait Decoder: Send + Sync + Debug {
    /// The structured result.
    type Output;

    /// Decodes one image's outputs.
    ///
    /// # Errors
    ///
    /// Returns a decode error if an expected tensor is missing, has the wrong
    /// rank or size, or refers to a class without a label.
    fn decode(&self, outputs: &OutputTensors) -> VisionResult<Self::Output>;

    /// The task family this decoder belongs to.
    fn task_type(&self) -> TaskType;
}

/// Resolves a named output, or the first one when no name is configured.
pub(crate) fn resolve_output<'a>(
    outputs: &'a OutputTensors,
    name: Option<&'a str>,
) -> VisionResult<(&'a str, &'a ArrayD<f32>)> {
    match name {
        Some(name) => outputs.get(name).map(|t| (name, t)),
        None => outputs
            .first()
            .ok_or_else(|| VisionError::decode_error("engine returned no outputs")),
    }
}

/// Flattens a named (or first) output, checking its element count.
pub(crate) fn flat_output(
    outputs: &OutputTensors,
    name: Option<&str>,
    expected_len: Option<usize>,
) -> VisionResult<Vec<f32>> {
    let (name, tensor) = resolve_output(outputs, name)?;
    if let Some(expected) = expected_len
        && tensor.len() != expected
    {
        return Err(VisionError::decode_error(format!(
            "output tensor '{}' has shape {:?} ({} values), expected {} values",
            name,
            tensor.shape(),
            tensor.len(),
            expected
        )));
    }
    Ok(flat_values(tensor))
}

/// The closed set of task decoders, selectable from configuration.
///
/// Serialized with an internal `"task"` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "task", rename_all = "snake_case")]
pub enum TaskDecoder {
    /// Label ranking.
    Classification(ClassificationDecoder),
    /// SSD-style box decoding.
    ObjectDetection(SsdDecoder),
    /// One skeleton per image.
    PoseEstimation(SinglePoseDecoder),
    /// Several boxed skeletons per image.
    MultiPoseEstimation(MultiPoseDecoder),
    /// Dense facial points.
    LandmarkDetection(LandmarkDecoder),
}

impl TaskDecoder {
    /// Checks decoder parameters without looking at any tensor.
    pub fn validate(&self) -> VisionResult<()> {
        match self {
            TaskDecoder::Classification(d) => d.validate(),
            TaskDecoder::ObjectDetection(d) => d.validate(),
            TaskDecoder::PoseEstimation(_) => Ok(()),
            TaskDecoder::MultiPoseEstimation(d) => d.validate(),
            TaskDecoder::LandmarkDetection(d) => d.validate(),
        }
    }
}

impl Decoder for TaskDecoder {
    type Output = Prediction;

    fn decode(&self, outputs: &OutputTensors) -> VisionResult<Prediction> {
        Ok(match self {
            TaskDecoder::Classification(d) => Prediction::Classes(d.decode(outputs)?),
            TaskDecoder::ObjectDetection(d) => Prediction::Objects(d.decode(outputs)?),
            TaskDecoder::PoseEstimation(d) => Prediction::Pose(d.decode(outputs)?),
            TaskDecoder::MultiPoseEstimation(d) => Prediction::Poses(d.decode(outputs)?),
            TaskDecoder::LandmarkDetection(d) => Prediction::Landmarks(d.decode(outputs)?),
        })
    }

    fn task_type(&self) -> TaskType {
        match self {
            TaskDecoder::Classification(d) => d.task_type(),
            TaskDecoder::ObjectDetection(d) => d.task_type(),
            TaskDecoder::PoseEstimation(d) => d.task_type(),
            TaskDecoder::MultiPoseEstimation(d) => d.task_type(),
            TaskDecoder::LandmarkDetection(d) => d.task_type(),
        }
    }
}

/// A decoded result of any task family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "task", content = "result", rename_all = "snake_case")]
pub enum Prediction {
    /// Ranked classes.
    Classes(Vec<Classification>),
    /// Detected boxes.
    Objects(Vec<DetectedObject>),
    /// A single skeleton.
    Pose(DetectedPose),
    /// Boxed skeletons.
    Poses(MultiPoseDetectionResult),
    /// Facial points.
    Landmarks(Vec<Landmark>),
}

impl Prediction {
    /// The task family that produced this result.
    pub fn task_type(&self) -> TaskType {
        match self {
            Prediction::Classes(_) => TaskType::Classification,
            Prediction::Objects(_) => TaskType::ObjectDetection,
            Prediction::Pose(_) => TaskType::PoseEstimation,
            Prediction::Poses(_) => TaskType::MultiPoseEstimation,
            Prediction::Landmarks(_) => TaskType::LandmarkDetection,
        }
    }
}
