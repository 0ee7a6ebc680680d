//! Object Detection Predictor
//!
//! This module provides a high-level API for SSD-style object detection.

use super::builder::{PredictorBuilderState, open_engine};
use super::core::ModelCore;
use crate::core::config::ModelConfig;
use crate::core::errors::VisionResult;
use crate::core::inference::{InferenceEngine, OrtEngine};
use crate::domain::detection::DetectedObject;
use crate::domain::image::ImageSource;
use crate::processors::decode::{DetectionOptions, SsdDecoder};
use std::path::Path;

/// Object detection predictor.
#[derive(Debug)]
pub struct ObjectDetectionPredictor<E: InferenceEngine = OrtEngine> {
    core: ModelCore<E, SsdDecoder>,
}

impl ObjectDetectionPredictor {
    /// Starts a builder seeded with the SSD-MobileNet-v1 preset.
    pub fn builder() -> ObjectDetectionPredictorBuilder {
        ObjectDetectionPredictorBuilder::new()
    }
}

impl<E: InferenceEngine> ObjectDetectionPredictor<E> {
    /// Builds a predictor from a configuration and an already opened engine.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the decoder is not an object detection
    /// decoder or the preprocessing does not compose.
    pub fn from_config(config: &ModelConfig, engine: E) -> VisionResult<Self> {
        config.validate()?;
        let decoder = expect_decoder!(config, ObjectDetection, "object detection");
        Ok(Self {
            core: ModelCore::new(config.build_preprocessor()?, engine, decoder),
        })
    }

    /// Detects objects in one image.
    ///
    /// `top_k` keeps only the `k` most probable detections (stable order);
    /// `threshold` overrides the decoder's minimum score.
    pub fn detect_objects(
        &mut self,
        image: impl Into<ImageSource>,
        top_k: Option<usize>,
        threshold: Option<f32>,
    ) -> VisionResult<Vec<DetectedObject>> {
        let options = DetectionOptions { top_k, threshold };
        self.core
            .run(image, |decoder, outputs| decoder.decode_with(outputs, &options))
    }

    /// Detects objects in several images, one result per image.
    pub fn detect_objects_batch<S: Into<ImageSource>>(
        &mut self,
        images: Vec<S>,
        options: DetectionOptions,
    ) -> Vec<VisionResult<Vec<DetectedObject>>> {
        self.core
            .run_batch(images, |decoder, outputs| decoder.decode_with(outputs, &options))
    }

    /// The shared core.
    pub fn core(&self) -> &ModelCore<E, SsdDecoder> {
        &self.core
    }
}

/// Builder for [`ObjectDetectionPredictor`].
#[derive(Debug, Clone)]
pub struct ObjectDetectionPredictorBuilder {
    state: PredictorBuilderState<ModelConfig>,
}

impl_task_predictor_builder!(ObjectDetectionPredictorBuilder, ModelConfig);

impl ObjectDetectionPredictorBuilder {
    /// Creates a builder seeded with the SSD-MobileNet-v1 preset.
    pub fn new() -> Self {
        Self {
            state: PredictorBuilderState::new(crate::models::ssd_mobilenet_v1()),
        }
    }

    /// Sets the default score threshold.
    pub fn score_threshold(mut self, threshold: f32) -> Self {
        if let crate::processors::decode::TaskDecoder::ObjectDetection(decoder) =
            &mut self.state.config_mut().decoder
        {
            decoder.threshold = threshold;
        }
        self
    }

    /// Sets the candidate cap.
    pub fn max_detections(mut self, max_detections: usize) -> Self {
        if let crate::processors::decode::TaskDecoder::ObjectDetection(decoder) =
            &mut self.state.config_mut().decoder
        {
            decoder.max_detections = max_detections;
        }
        self
    }

    /// Opens the model with ONNX Runtime.
    pub fn build<P: AsRef<Path>>(self, model_path: P) -> VisionResult<ObjectDetectionPredictor> {
        let (config, ort_config) = self.state.into_parts();
        let engine = open_engine(&config, ort_config, model_path.as_ref())?;
        ObjectDetectionPredictor::from_config(&config, engine)
    }

    /// Uses a caller-supplied engine.
    pub fn build_with_engine<E: InferenceEngine>(
        self,
        engine: E,
    ) -> VisionResult<ObjectDetectionPredictor<E>> {
        let (config, _) = self.state.into_parts();
        ObjectDetectionPredictor::from_config(&config, engine)
    }
}

impl Default for ObjectDetectionPredictorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
