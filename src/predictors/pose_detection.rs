//! Pose Detection Predictors
//!
//! Single-person ([`PoseDetectionPredictor`]) and multi-person
//! ([`MultiPoseDetectionPredictor`]) keypoint detection.

use super::builder::{PredictorBuilderState, open_engine};
use super::core::ModelCore;
use crate::core::config::ModelConfig;
use crate::core::errors::VisionResult;
use crate::core::inference::{InferenceEngine, OrtEngine};
use crate::domain::image::ImageSource;
use crate::domain::pose::{DetectedPose, MultiPoseDetectionResult};
use crate::processors::decode::{Decoder, MultiPoseDecoder, SinglePoseDecoder, TaskDecoder};
use std::path::Path;

/// Single-person pose predictor.
#[derive(Debug)]
pub struct PoseDetectionPredictor<E: InferenceEngine = OrtEngine> {
    core: ModelCore<E, SinglePoseDecoder>,
}

impl PoseDetectionPredictor {
    /// Starts a builder seeded with MoveNet Lightning.
    pub fn builder() -> PoseDetectionPredictorBuilder {
        PoseDetectionPredictorBuilder::new()
    }
}

impl<E: InferenceEngine> PoseDetectionPredictor<E> {
    /// Builds a predictor from a configuration and an already opened engine.
    pub fn from_config(config: &ModelConfig, engine: E) -> VisionResult<Self> {
        config.validate()?;
        let decoder = expect_decoder!(config, PoseEstimation, "pose estimation");
        Ok(Self {
            core: ModelCore::new(config.build_preprocessor()?, engine, decoder),
        })
    }

    /// Detects the 17 keypoints of the single person in `image`.
    pub fn detect_pose(&mut self, image: impl Into<ImageSource>) -> VisionResult<DetectedPose> {
        self.core.run(image, |decoder, outputs| decoder.decode(outputs))
    }

    /// Detects one pose per image.
    pub fn detect_pose_batch<S: Into<ImageSource>>(
        &mut self,
        images: Vec<S>,
    ) -> Vec<VisionResult<DetectedPose>> {
        self.core
            .run_batch(images, |decoder, outputs| decoder.decode(outputs))
    }

    /// The shared core.
    pub fn core(&self) -> &ModelCore<E, SinglePoseDecoder> {
        &self.core
    }
}

/// Multi-person pose predictor.
#[derive(Debug)]
pub struct MultiPoseDetectionPredictor<E: InferenceEngine = OrtEngine> {
    core: ModelCore<E, MultiPoseDecoder>,
}

impl MultiPoseDetectionPredictor {
    /// Starts a builder seeded with MoveNet multi-pose Lightning.
    pub fn builder() -> MultiPoseDetectionPredictorBuilder {
        MultiPoseDetectionPredictorBuilder::new()
    }
}

impl<E: InferenceEngine> MultiPoseDetectionPredictor<E> {
    /// Builds a predictor from a configuration and an already opened engine.
    pub fn from_config(config: &ModelConfig, engine: E) -> VisionResult<Self> {
        config.validate()?;
        let decoder = expect_decoder!(config, MultiPoseEstimation, "multi-pose estimation");
        Ok(Self {
            core: ModelCore::new(config.build_preprocessor()?, engine, decoder),
        })
    }

    /// Detects every person in `image`, in model emission order.
    pub fn detect_poses(
        &mut self,
        image: impl Into<ImageSource>,
    ) -> VisionResult<MultiPoseDetectionResult> {
        self.core.run(image, |decoder, outputs| decoder.decode(outputs))
    }

    /// Detects people in several images, one result per image.
    pub fn detect_poses_batch<S: Into<ImageSource>>(
        &mut self,
        images: Vec<S>,
    ) -> Vec<VisionResult<MultiPoseDetectionResult>> {
        self.core
            .run_batch(images, |decoder, outputs| decoder.decode(outputs))
    }

    /// The shared core.
    pub fn core(&self) -> &ModelCore<E, MultiPoseDecoder> {
        &self.core
    }
}

/// Builder for [`PoseDetectionPredictor`].
#[derive(Debug, Clone)]
pub struct PoseDetectionPredictorBuilder {
    state: PredictorBuilderState<ModelConfig>,
}

impl_task_predictor_builder!(PoseDetectionPredictorBuilder, ModelConfig);

impl PoseDetectionPredictorBuilder {
    /// Creates a builder seeded with MoveNet Lightning.
    pub fn new() -> Self {
        Self {
            state: PredictorBuilderState::new(crate::models::single_pose_lightning()),
        }
    }

    /// Switches to MoveNet Thunder.
    pub fn thunder(mut self) -> Self {
        self.state.set_config(crate::models::single_pose_thunder());
        self
    }

    /// Opens the model with ONNX Runtime.
    pub fn build<P: AsRef<Path>>(self, model_path: P) -> VisionResult<PoseDetectionPredictor> {
        let (config, ort_config) = self.state.into_parts();
        let engine = open_engine(&config, ort_config, model_path.as_ref())?;
        PoseDetectionPredictor::from_config(&config, engine)
    }

    /// Uses a caller-supplied engine.
    pub fn build_with_engine<E: InferenceEngine>(
        self,
        engine: E,
    ) -> VisionResult<PoseDetectionPredictor<E>> {
        let (config, _) = self.state.into_parts();
        PoseDetectionPredictor::from_config(&config, engine)
    }
}

impl Default for PoseDetectionPredictorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`MultiPoseDetectionPredictor`].
#[derive(Debug, Clone)]
pub struct MultiPoseDetectionPredictorBuilder {
    state: PredictorBuilderState<ModelConfig>,
}

impl_task_predictor_builder!(MultiPoseDetectionPredictorBuilder, ModelConfig);

impl MultiPoseDetectionPredictorBuilder {
    /// Creates a builder seeded with MoveNet multi-pose Lightning.
    pub fn new() -> Self {
        Self {
            state: PredictorBuilderState::new(crate::models::multi_pose_lightning()),
        }
    }

    fn decoder_mut(&mut self) -> Option<&mut MultiPoseDecoder> {
        match &mut self.state.config_mut().decoder {
            TaskDecoder::MultiPoseEstimation(decoder) => Some(decoder),
            _ => None,
        }
    }

    /// Sets the person probability threshold.
    pub fn score_threshold(mut self, threshold: f32) -> Self {
        if let Some(decoder) = self.decoder_mut() {
            decoder.threshold = threshold;
        }
        self
    }

    /// Labels landmarks with the canonical keypoint names.
    pub fn with_keypoint_names(mut self) -> Self {
        if let Some(decoder) = self.decoder_mut() {
            *decoder = decoder.clone().with_keypoint_names();
        }
        self
    }

    /// Opens the model with ONNX Runtime.
    pub fn build<P: AsRef<Path>>(
        self,
        model_path: P,
    ) -> VisionResult<MultiPoseDetectionPredictor> {
        let (config, ort_config) = self.state.into_parts();
        let engine = open_engine(&config, ort_config, model_path.as_ref())?;
        MultiPoseDetectionPredictor::from_config(&config, engine)
    }

    /// Uses a caller-supplied engine.
    pub fn build_with_engine<E: InferenceEngine>(
        self,
        engine: E,
    ) -> VisionResult<MultiPoseDetectionPredictor<E>> {
        let (config, _) = self.state.into_parts();
        MultiPoseDetectionPredictor::from_config(&config, engine)
    }
}

impl Default for MultiPoseDetectionPredictorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
