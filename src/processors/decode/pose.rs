//! Pose decoding for single- and multi-person keypoint models.
//!
//! Both variants read keypoints as `(y, x, confidence)` triples over the 17
//! body keypoints. The multi-person output appends a box and a person
//! probability to every skeleton, 56 floats per person.

use crate::core::constants::{
    DEFAULT_MULTIPOSE_MAX_DETECTIONS, DEFAULT_MULTIPOSE_THRESHOLD, KEYPOINT_STRIDE,
    MULTIPOSE_DETECTION_LEN, NUM_KEYPOINTS,
};
use crate::core::errors::{VisionError, VisionResult};
use crate::core::task::TaskType;
use crate::core::tensor::OutputTensors;
use crate::domain::detection::DetectedObject;
use crate::domain::pose::{DetectedPose, Keypoint, MultiPoseDetectionResult, PoseLandmark};
use crate::processors::decode::{Decoder, flat_output};
use serde::{Deserialize, Serialize};

const BOX_START: usize = NUM_KEYPOINTS * KEYPOINT_STRIDE;
const PROBABILITY_INDEX: usize = BOX_START + 4;

/// Decodes a single `17 x 3` keypoint tensor into one skeleton.
///
/// The first float of every triple is stored as `x` and the second as `y`.
/// Single-pose exports emit `y` first, so this keeps the historical field
/// mapping bit for bit; see the crate's design notes before changing it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SinglePoseDecoder {
    /// Output holding the keypoints; the first output when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_name: Option<String>,
}

impl SinglePoseDecoder {
    /// Creates a decoder reading the first output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads keypoints from a named output.
    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }
}

impl Decoder for SinglePoseDecoder {
    type Output = DetectedPose;

    fn decode(&self, outputs: &OutputTensors) -> VisionResult<DetectedPose> {
        let values = flat_output(
            outputs,
            self.output_name.as_deref(),
            Some(NUM_KEYPOINTS * KEYPOINT_STRIDE),
        )?;
        let landmarks = Keypoint::ALL
            .iter()
            .zip(values.chunks_exact(KEYPOINT_STRIDE))
            .map(|(keypoint, triple)| PoseLandmark {
                label: keypoint.label().to_string(),
                x: triple[0],
                y: triple[1],
                probability: triple[2],
            })
            .collect();
        Ok(DetectedPose::new(landmarks))
    }

    fn task_type(&self) -> TaskType {
        TaskType::PoseEstimation
    }
}

fn default_multipose_threshold() -> f32 {
    DEFAULT_MULTIPOSE_THRESHOLD
}

fn default_multipose_max() -> usize {
    DEFAULT_MULTIPOSE_MAX_DETECTIONS
}

fn default_person_label() -> String {
    "person".to_string()
}

/// Decodes a `[N, 56]` multi-person output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiPoseDecoder {
    /// Output holding the detections; the first output when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_name: Option<String>,
    /// Minimum person probability.
    #[serde(default = "default_multipose_threshold")]
    pub threshold: f32,
    /// Maximum number of detections read.
    #[serde(default = "default_multipose_max")]
    pub max_detections: usize,
    /// Keypoint labels by index; landmarks are unlabelled when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keypoint_labels: Option<Vec<String>>,
    /// Label of the per-person box.
    #[serde(default = "default_person_label")]
    pub object_label: String,
}

impl Default for MultiPoseDecoder {
    fn default() -> Self {
        Self {
            output_name: None,
            threshold: DEFAULT_MULTIPOSE_THRESHOLD,
            max_detections: DEFAULT_MULTIPOSE_MAX_DETECTIONS,
            keypoint_labels: None,
            object_label: default_person_label(),
        }
    }
}

impl MultiPoseDecoder {
    /// Creates a decoder with the default threshold and cap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads detections from a named output.
    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    /// Sets the person probability threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets the detection cap.
    pub fn with_max_detections(mut self, max_detections: usize) -> Self {
        self.max_detections = max_detections;
        self
    }

    /// Labels landmarks with the canonical keypoint names.
    pub fn with_keypoint_names(mut self) -> Self {
        self.keypoint_labels = Some(
            Keypoint::ALL
                .iter()
                .map(|k| k.label().to_string())
                .collect(),
        );
        self
    }

    pub(crate) fn validate(&self) -> VisionResult<()> {
        if let Some(labels) = &self.keypoint_labels
            && labels.len() != NUM_KEYPOINTS
        {
            return Err(VisionError::config_error(format!(
                "multi-pose keypoint labels must list {} names, got {}",
                NUM_KEYPOINTS,
                labels.len()
            )));
        }
        Ok(())
    }

    fn keypoint_label(&self, index: usize) -> String {
        self.keypoint_labels
            .as_ref()
            .and_then(|labels| labels.get(index))
            .cloned()
            .unwrap_or_default()
    }
}

impl Decoder for MultiPoseDecoder {
    type Output = MultiPoseDetectionResult;

    fn decode(&self, outputs: &OutputTensors) -> VisionResult<MultiPoseDetectionResult> {
        let values = flat_output(outputs, self.output_name.as_deref(), None)?;
        if values.len() % MULTIPOSE_DETECTION_LEN != 0 {
            return Err(VisionError::decode_error(format!(
                "multi-pose output has {} values, not a multiple of {}",
                values.len(),
                MULTIPOSE_DETECTION_LEN
            )));
        }

        let mut result = MultiPoseDetectionResult::new();
        for detection in values
            .chunks_exact(MULTIPOSE_DETECTION_LEN)
            .take(self.max_detections)
        {
            let probability = detection[PROBABILITY_INDEX];
            if probability < self.threshold {
                continue;
            }
            let landmarks = detection[..BOX_START]
                .chunks_exact(KEYPOINT_STRIDE)
                .enumerate()
                .map(|(k, triple)| PoseLandmark {
                    label: self.keypoint_label(k),
                    x: triple[1],
                    y: triple[0],
                    probability: triple[2],
                })
                .collect();
            let bbox = [
                detection[BOX_START],
                detection[BOX_START + 1],
                detection[BOX_START + 2],
                detection[BOX_START + 3],
            ];
            result.push(
                DetectedObject::new(self.object_label.clone(), probability, bbox),
                DetectedPose::new(landmarks),
            );
        }

        tracing::debug!("Multi-pose decode: {} person(s) kept", result.len());
        Ok(result)
    }

    fn task_type(&self) -> TaskType {
        TaskType::MultiPoseEstimation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};

    fn single_output(values: Vec<f32>) -> OutputTensors {
        let n = values.len();
        OutputTensors::new().with(
            "output_0",
            ArrayD::from_shape_vec(IxDyn(&[1, 1, n / 3, 3]), values).unwrap(),
        )
    }

    #[test]
    fn test_single_pose_count_and_field_mapping() {
        let values: Vec<f32> = (0..51).map(|i| i as f32 / 100.0).collect();
        let pose = SinglePoseDecoder::new()
            .decode(&single_output(values))
            .unwrap();
        assert_eq!(pose.landmarks().len(), 17);
        assert_eq!(pose.edges().len(), 18);
        let nose = &pose.landmarks()[0];
        assert_eq!(nose.label, "nose");
        assert_eq!((nose.x, nose.y, nose.probability), (0.0, 0.01, 0.02));
        let ankle = pose.landmark(Keypoint::RightAnkle).unwrap();
        assert_eq!((ankle.x, ankle.y), (0.48, 0.49));
    }

    #[test]
    fn test_single_pose_wrong_size() {
        let err = SinglePoseDecoder::new()
            .decode(&single_output(vec![0.0; 48]))
            .unwrap_err();
        assert!(err.is_decode());
    }

    fn detection(probability: f32, marker: f32) -> Vec<f32> {
        let mut d = vec![0.0; MULTIPOSE_DETECTION_LEN];
        d[0] = marker; // nose y
        d[1] = marker / 2.0; // nose x
        d[BOX_START..PROBABILITY_INDEX].copy_from_slice(&[0.1, 0.2, 0.3, 0.4]);
        d[PROBABILITY_INDEX] = probability;
        d
    }

    #[test]
    fn test_multi_pose_filters_and_keeps_order() {
        let probs = [0.9, 0.01, 0.5, 0.04, 0.2, 0.0];
        let values: Vec<f32> = probs
            .iter()
            .enumerate()
            .flat_map(|(i, &p)| detection(p, i as f32 / 10.0))
            .collect();
        let outputs = OutputTensors::new().with(
            "output_0",
            ArrayD::from_shape_vec(IxDyn(&[1, 6, 56]), values).unwrap(),
        );
        let result = MultiPoseDecoder::new().decode(&outputs).unwrap();
        assert_eq!(result.len(), 3);
        let kept: Vec<f32> = result.iter().map(|(o, _)| o.probability).collect();
        assert_eq!(kept, vec![0.9, 0.5, 0.2]);

        let (object, pose) = result.iter().nth(1).unwrap();
        assert_eq!((object.y_min, object.x_min, object.y_max, object.x_max), (0.1, 0.2, 0.3, 0.4));
        let nose = &pose.landmarks()[0];
        assert_eq!((nose.y, nose.x), (0.2, 0.1));
        assert_eq!(nose.label, "");
    }

    #[test]
    fn test_multi_pose_labels_and_bad_length() {
        let outputs = OutputTensors::new().with(
            "out",
            ArrayD::from_shape_vec(IxDyn(&[1, 56]), detection(0.8, 0.0)).unwrap(),
        );
        let result = MultiPoseDecoder::new()
            .with_keypoint_names()
            .decode(&outputs)
            .unwrap();
        let (_, pose) = result.iter().next().unwrap();
        assert_eq!(pose.landmarks()[16].label, "right_ankle");

        let bad = OutputTensors::new().with("out", ArrayD::zeros(IxDyn(&[1, 55])));
        assert!(MultiPoseDecoder::new().decode(&bad).unwrap_err().is_decode());
    }
}
