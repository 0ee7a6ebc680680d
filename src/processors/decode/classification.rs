//! Classification decoding: arg-max and top-K label ranking.

use crate::core::constants::DEFAULT_TOPK;
use crate::core::errors::{VisionError, VisionResult};
use crate::core::task::TaskType;
use crate::core::tensor::{OutputTensors, squeeze_leading};
use crate::domain::labels::LabelMap;
use crate::domain::landmark::Classification;
use crate::processors::decode::{Decoder, resolve_output};
use crate::processors::topk::{argmax, topk};
use serde::{Deserialize, Serialize};

fn default_top_k() -> usize {
    DEFAULT_TOPK
}

/// Decodes a class score vector into labelled classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationDecoder {
    /// Class index to label table.
    pub labels: LabelMap,
    /// Output holding the scores; the first output when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_name: Option<String>,
    /// Number of classes returned by [`Decoder::decode`].
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl ClassificationDecoder {
    /// Creates a decoder reading the first output.
    pub fn new(labels: LabelMap) -> Self {
        Self {
            labels,
            output_name: None,
            top_k: DEFAULT_TOPK,
        }
    }

    /// Reads scores from a named output.
    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    /// Sets how many classes [`Decoder::decode`] returns.
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    pub(crate) fn validate(&self) -> VisionResult<()> {
        if self.top_k == 0 {
            return Err(VisionError::config_error_with_context(
                "top_k",
                "0",
                "must be greater than 0",
            ));
        }
        Ok(())
    }

    fn scores(&self, outputs: &OutputTensors) -> VisionResult<Vec<f32>> {
        let (name, tensor) = resolve_output(outputs, self.output_name.as_deref())?;
        let scores = squeeze_leading(tensor, 1)
            .ok_or_else(|| VisionError::unexpected_rank(name, "1 or [1, N]", tensor.shape()))?;
        if scores.is_empty() {
            return Err(VisionError::decode_error(format!(
                "output tensor '{}' holds no class scores",
                name
            )));
        }
        Ok(scores.iter().copied().collect())
    }

    fn classification(&self, index: usize, probability: f32) -> VisionResult<Classification> {
        let label = self
            .labels
            .get(index)
            .ok_or_else(|| VisionError::unknown_class(index as i64))?;
        Ok(Classification {
            index,
            label: label.to_string(),
            probability,
        })
    }

    /// Returns the highest-scoring class.
    pub fn argmax(&self, outputs: &OutputTensors) -> VisionResult<Classification> {
        let scores = self.scores(outputs)?;
        let (index, probability) = argmax(&scores)
            .ok_or_else(|| VisionError::decode_error("no class scores to rank"))?;
        self.classification(index, probability)
    }

    /// Returns the `k` best classes, best first; ties keep ascending class index.
    pub fn top_k(&self, outputs: &OutputTensors, k: usize) -> VisionResult<Vec<Classification>> {
        let scores = self.scores(outputs)?;
        if k > scores.len() {
            tracing::warn!(
                "Requested top-{} from {} classes; returning all classes",
                k,
                scores.len()
            );
        }
        let ranked = topk(&scores, k)?;
        ranked
            .indexes
            .into_iter()
            .zip(ranked.scores)
            .map(|(index, probability)| self.classification(index, probability))
            .collect()
    }
}

impl Decoder for ClassificationDecoder {
    type Output = Vec<Classification>;

    fn decode(&self, outputs: &OutputTensors) -> VisionResult<Vec<Classification>> {
        self.top_k(outputs, self.top_k)
    }

    fn task_type(&self) -> TaskType {
        TaskType::Classification
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};

    fn outputs(scores: &[f32]) -> OutputTensors {
        let tensor = ArrayD::from_shape_vec(IxDyn(&[1, scores.len()]), scores.to_vec()).unwrap();
        OutputTensors::new().with("probs", tensor)
    }

    #[test]
    fn test_top_k_stable_ties() {
        let decoder = ClassificationDecoder::new(LabelMap::from_names(["A", "B", "C"]));
        let result = decoder.top_k(&outputs(&[0.2, 0.2, 0.5]), 2).unwrap();
        let labels: Vec<&str> = result.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["C", "A"]);
        assert_eq!(result[0].probability, 0.5);
        assert_eq!(result[1].probability, 0.2);
    }

    #[test]
    fn test_top_k_with_nan_scores() {
        let names: Vec<String> = (0..64).map(|i| format!("class_{i}")).collect();
        let decoder = ClassificationDecoder::new(LabelMap::from_names(names));
        let scores: Vec<f32> = (0..64)
            .map(|i| if i % 3 == 0 { f32::NAN } else { i as f32 / 64.0 })
            .collect();
        let result = decoder.top_k(&outputs(&scores), 5).unwrap();
        let indexes: Vec<usize> = result.iter().map(|c| c.index).collect();
        assert_eq!(indexes, vec![62, 61, 59, 58, 56]);
        assert!(result.iter().all(|c| c.probability.is_finite()));
    }

    #[test]
    fn test_argmax() {
        let decoder = ClassificationDecoder::new(LabelMap::from_names(["cat", "dog"]))
            .with_output_name("probs");
        let best = decoder.argmax(&outputs(&[0.1, 0.9])).unwrap();
        assert_eq!(best.label, "dog");
        assert_eq!(best.index, 1);
    }

    #[test]
    fn test_missing_label_is_decode_error() {
        let decoder = ClassificationDecoder::new(LabelMap::from_names(["only"]));
        let err = decoder.argmax(&outputs(&[0.1, 0.9])).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_wrong_rank_is_decode_error() {
        let decoder = ClassificationDecoder::new(LabelMap::from_names(["a", "b"]));
        let tensor = ArrayD::<f32>::zeros(IxDyn(&[2, 2]));
        let err = decoder
            .argmax(&OutputTensors::new().with("probs", tensor))
            .unwrap_err();
        assert!(err.is_decode());
    }
}
