//! SSD-style detection decoding.
//!
//! SSD exports emit four tensors per image: boxes `[N, 4]` as
//! `[y_min, x_min, y_max, x_max]` normalized to the image, class ids `[N]`,
//! scores `[N]` and an optional detection count. Candidates arrive already
//! sorted by score, so the decoder keeps their order unless the caller asks for
//! a top-K cut.

use crate::core::constants::{DEFAULT_SSD_MAX_DETECTIONS, DEFAULT_SSD_THRESHOLD};
use crate::core::errors::{VisionError, VisionResult};
use crate::core::task::TaskType;
use crate::core::tensor::{OutputTensors, squeeze_leading};
use crate::domain::detection::DetectedObject;
use crate::domain::labels::LabelMap;
use crate::processors::decode::Decoder;
use crate::processors::topk::sort_descending_stable;
use ndarray::{ArrayViewD, Axis};
use serde::{Deserialize, Serialize};

/// Names and index offsets of an SSD export's output tensors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SsdModelMetadata {
    /// Output holding `[N, 4]` boxes.
    pub boxes_output: String,
    /// Output holding `[N]` class ids.
    pub classes_output: String,
    /// Output holding `[N]` scores.
    pub scores_output: String,
    /// Output holding the number of valid detections, if the export has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_detections_output: Option<String>,
    /// Added to every class id before the label lookup.
    #[serde(default)]
    pub class_offset: i64,
    /// Added to the detection index when reading boxes and scores.
    #[serde(default)]
    pub box_offset: usize,
}

impl SsdModelMetadata {
    /// Creates metadata with no offsets and no count tensor.
    pub fn new(
        boxes_output: impl Into<String>,
        classes_output: impl Into<String>,
        scores_output: impl Into<String>,
    ) -> Self {
        Self {
            boxes_output: boxes_output.into(),
            classes_output: classes_output.into(),
            scores_output: scores_output.into(),
            num_detections_output: None,
            class_offset: 0,
            box_offset: 0,
        }
    }

    /// Sets the detection count output.
    pub fn with_num_detections(mut self, name: impl Into<String>) -> Self {
        self.num_detections_output = Some(name.into());
        self
    }

    /// Sets the class id offset.
    pub fn with_class_offset(mut self, offset: i64) -> Self {
        self.class_offset = offset;
        self
    }

    /// Sets the box/score index offset.
    pub fn with_box_offset(mut self, offset: usize) -> Self {
        self.box_offset = offset;
        self
    }
}

/// Per-call overrides for detection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DetectionOptions {
    /// Keep only the `k` most probable detections.
    pub top_k: Option<usize>,
    /// Minimum score; the decoder's threshold when unset.
    pub threshold: Option<f32>,
}

fn default_threshold() -> f32 {
    DEFAULT_SSD_THRESHOLD
}

fn default_max_detections() -> usize {
    DEFAULT_SSD_MAX_DETECTIONS
}

/// Decodes SSD outputs into [`DetectedObject`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SsdDecoder {
    /// Output tensor layout.
    pub metadata: SsdModelMetadata,
    /// Class id to label table.
    pub labels: LabelMap,
    /// Default minimum score.
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    /// Maximum number of candidates read.
    #[serde(default = "default_max_detections")]
    pub max_detections: usize,
}

impl SsdDecoder {
    /// Creates a decoder with the default threshold and cap.
    pub fn new(metadata: SsdModelMetadata, labels: LabelMap) -> Self {
        Self {
            metadata,
            labels,
            threshold: DEFAULT_SSD_THRESHOLD,
            max_detections: DEFAULT_SSD_MAX_DETECTIONS,
        }
    }

    /// Sets the default score threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets the candidate cap.
    pub fn with_max_detections(mut self, max_detections: usize) -> Self {
        self.max_detections = max_detections;
        self
    }

    pub(crate) fn validate(&self) -> VisionResult<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(VisionError::config_error_with_context(
                "threshold",
                &self.threshold.to_string(),
                "must be within [0, 1]",
            ));
        }
        Ok(())
    }

    fn tensor<'a>(
        outputs: &'a OutputTensors,
        name: &str,
        rank: usize,
        expected: &str,
    ) -> VisionResult<ArrayViewD<'a, f32>> {
        let tensor = outputs.get(name)?;
        squeeze_leading(tensor, rank)
            .ok_or_else(|| VisionError::unexpected_rank(name, expected, tensor.shape()))
    }

    /// Decodes with per-call overrides.
    ///
    /// # Errors
    ///
    /// Returns a decode error if a tensor named in the metadata is missing or
    /// has the wrong rank, or if a kept detection's class has no label. Returns
    /// a configuration error if `options.top_k` is `Some(0)`.
    pub fn decode_with(
        &self,
        outputs: &OutputTensors,
        options: &DetectionOptions,
    ) -> VisionResult<Vec<DetectedObject>> {
        let meta = &self.metadata;
        let boxes = Self::tensor(outputs, &meta.boxes_output, 2, "2 or [1, N, 4]")?;
        if boxes.shape()[1] != 4 {
            return Err(VisionError::unexpected_rank(
                &meta.boxes_output,
                "[N, 4]",
                boxes.shape(),
            ));
        }
        let classes = Self::tensor(outputs, &meta.classes_output, 1, "1 or [1, N]")?;
        let scores = Self::tensor(outputs, &meta.scores_output, 1, "1 or [1, N]")?;

        let available = scores
            .len()
            .min(boxes.shape()[0])
            .saturating_sub(meta.box_offset)
            .min(classes.len());
        let reported = match &meta.num_detections_output {
            Some(name) => {
                let count = outputs.get(name)?;
                count.iter().next().map(|&n| n.max(0.0) as usize).ok_or_else(|| {
                    VisionError::decode_error(format!("output tensor '{}' is empty", name))
                })?
            }
            None => available,
        };
        let count = reported.min(self.max_detections).min(available);
        let threshold = options.threshold.unwrap_or(self.threshold);

        let mut detections = Vec::new();
        for i in 0..count {
            let j = i + meta.box_offset;
            let score = scores[[j]];
            if score.is_nan() || score < threshold {
                continue;
            }
            let bbox = boxes.index_axis(Axis(0), j);
            let class_id = classes[[i]].round() as i64 + meta.class_offset;
            let label = self
                .labels
                .get_signed(class_id)
                .ok_or_else(|| VisionError::unknown_class(class_id))?;
            detections.push(DetectedObject::new(
                label,
                score,
                [bbox[[0]], bbox[[1]], bbox[[2]], bbox[[3]]],
            ));
        }

        if let Some(k) = options.top_k {
            if k == 0 {
                return Err(VisionError::config_error("top_k must be greater than 0"));
            }
            sort_descending_stable(&mut detections, |d| d.probability);
            detections.truncate(k);
        }

        tracing::debug!(
            "SSD decode: {} candidate(s), {} kept at threshold {}",
            count,
            detections.len(),
            threshold
        );
        Ok(detections)
    }
}

impl Decoder for SsdDecoder {
    type Output = Vec<DetectedObject>;

    fn decode(&self, outputs: &OutputTensors) -> VisionResult<Vec<DetectedObject>> {
        self.decode_with(outputs, &DetectionOptions::default())
    }

    fn task_type(&self) -> TaskType {
        TaskType::ObjectDetection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};

    fn arr(dims: &[usize], data: Vec<f32>) -> ArrayD<f32> {
        ArrayD::from_shape_vec(IxDyn(dims), data).unwrap()
    }

    fn outputs(scores: Vec<f32>, classes: Vec<f32>) -> OutputTensors {
        let n = scores.len();
        let boxes: Vec<f32> = (0..n)
            .flat_map(|i| {
                let v = i as f32 * 0.1;
                [v, v, v + 0.5, v + 0.5]
            })
            .collect();
        OutputTensors::new()
            .with("boxes", arr(&[1, n, 4], boxes))
            .with("classes", arr(&[1, n], classes))
            .with("scores", arr(&[1, n], scores))
            .with("count", arr(&[1], vec![n as f32]))
    }

    fn decoder() -> SsdDecoder {
        let meta = SsdModelMetadata::new("boxes", "classes", "scores").with_num_detections("count");
        SsdDecoder::new(meta, LabelMap::from_names(["person", "car", "dog"]))
    }

    #[test]
    fn test_threshold_keeps_order() {
        let out = outputs(vec![0.9, 0.4, 0.05], vec![0.0, 1.0, 2.0]);
        let found = decoder().decode(&out).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].label, "person");
        assert_eq!(found[0].probability, 0.9);
        assert_eq!(
            (found[0].y_min, found[0].x_min, found[0].y_max, found[0].x_max),
            (0.0, 0.0, 0.5, 0.5)
        );
    }

    #[test]
    fn test_caller_threshold_and_top_k() {
        let out = outputs(vec![0.6, 0.8, 0.8, 0.3], vec![0.0, 1.0, 2.0, 0.0]);
        let options = DetectionOptions {
            top_k: Some(2),
            threshold: Some(0.5),
        };
        let found = decoder().decode_with(&out, &options).unwrap();
        let labels: Vec<&str> = found.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["car", "dog"]);
    }

    #[test]
    fn test_count_and_cap_limit_candidates() {
        let mut out = outputs(vec![0.9, 0.9, 0.9], vec![0.0, 0.0, 0.0]);
        out.insert("count", arr(&[1], vec![2.0]));
        assert_eq!(decoder().decode(&out).unwrap().len(), 2);
        assert_eq!(decoder().with_max_detections(1).decode(&out).unwrap().len(), 1);
    }

    #[test]
    fn test_class_offset() {
        let meta = SsdModelMetadata::new("boxes", "classes", "scores").with_class_offset(1);
        let decoder = SsdDecoder::new(meta, LabelMap::coco91());
        let out = outputs(vec![0.7], vec![0.0]);
        assert_eq!(decoder.decode(&out).unwrap()[0].label, "person");
    }

    #[test]
    fn test_box_offset_shifts_boxes_and_scores() {
        let meta = SsdModelMetadata::new("boxes", "classes", "scores").with_box_offset(1);
        let decoder = SsdDecoder::new(meta, LabelMap::from_names(["a", "b"]));
        let out = outputs(vec![0.1, 0.9], vec![1.0, 0.0]);
        let found = decoder.decode(&out).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].label, "b");
        assert_eq!(found[0].probability, 0.9);
        assert!((found[0].y_min - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_nan_scores_are_skipped() {
        let out = outputs(
            vec![f32::NAN, 0.7, f32::NAN, 0.9],
            vec![0.0, 1.0, 0.0, 2.0],
        );
        let options = DetectionOptions {
            top_k: Some(3),
            threshold: None,
        };
        let found = decoder().decode_with(&out, &options).unwrap();
        let labels: Vec<&str> = found.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["dog", "car"]);
    }

    #[test]
    fn test_unknown_class_fails() {
        let out = outputs(vec![0.9], vec![7.0]);
        assert!(decoder().decode(&out).unwrap_err().is_decode());
    }

    #[test]
    fn test_missing_tensor_fails() {
        let out = OutputTensors::new().with("boxes", arr(&[1, 4], vec![0.0; 4]));
        let err = decoder().decode(&out).unwrap_err();
        assert!(err.is_decode());
        assert!(err.to_string().contains("classes"));
    }
}
