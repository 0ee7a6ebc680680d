//! Face Landmark Predictor

use super::builder::{PredictorBuilderState, open_engine};
use super::core::ModelCore;
use crate::core::config::ModelConfig;
use crate::core::errors::VisionResult;
use crate::core::inference::{InferenceEngine, OrtEngine};
use crate::domain::image::ImageSource;
use crate::domain::landmark::Landmark;
use crate::processors::decode::{Decoder, LandmarkDecoder};
use std::path::Path;

/// Dense facial landmark predictor.
///
/// Expects an aligned face crop; points are normalized to the crop.
#[derive(Debug)]
pub struct FaceLandmarkPredictor<E: InferenceEngine = OrtEngine> {
    core: ModelCore<E, LandmarkDecoder>,
}

impl FaceLandmarkPredictor {
    /// Starts a builder seeded with the 2D106 preset.
    pub fn builder() -> FaceLandmarkPredictorBuilder {
        FaceLandmarkPredictorBuilder::new()
    }
}

impl<E: InferenceEngine> FaceLandmarkPredictor<E> {
    /// Builds a predictor from a configuration and an already opened engine.
    pub fn from_config(config: &ModelConfig, engine: E) -> VisionResult<Self> {
        config.validate()?;
        let decoder = expect_decoder!(config, LandmarkDetection, "landmark detection");
        Ok(Self {
            core: ModelCore::new(config.build_preprocessor()?, engine, decoder),
        })
    }

    /// Detects landmarks in a face crop.
    pub fn detect_landmarks(&mut self, image: impl Into<ImageSource>) -> VisionResult<Vec<Landmark>> {
        self.core.run(image, |decoder, outputs| decoder.decode(outputs))
    }

    /// Detects landmarks in several face crops.
    pub fn detect_landmarks_batch<S: Into<ImageSource>>(
        &mut self,
        images: Vec<S>,
    ) -> Vec<VisionResult<Vec<Landmark>>> {
        self.core
            .run_batch(images, |decoder, outputs| decoder.decode(outputs))
    }

    /// The shared core.
    pub fn core(&self) -> &ModelCore<E, LandmarkDecoder> {
        &self.core
    }
}

/// Builder for [`FaceLandmarkPredictor`].
#[derive(Debug, Clone)]
pub struct FaceLandmarkPredictorBuilder {
    state: PredictorBuilderState<ModelConfig>,
}

impl_task_predictor_builder!(FaceLandmarkPredictorBuilder, ModelConfig);

impl FaceLandmarkPredictorBuilder {
    /// Creates a builder seeded with the 2D106 preset.
    pub fn new() -> Self {
        Self {
            state: PredictorBuilderState::new(crate::models::face_alignment_2d106()),
        }
    }

    /// Opens the model with ONNX Runtime.
    pub fn build<P: AsRef<Path>>(self, model_path: P) -> VisionResult<FaceLandmarkPredictor> {
        let (config, ort_config) = self.state.into_parts();
        let engine = open_engine(&config, ort_config, model_path.as_ref())?;
        FaceLandmarkPredictor::from_config(&config, engine)
    }

    /// Uses a caller-supplied engine.
    pub fn build_with_engine<E: InferenceEngine>(
        self,
        engine: E,
    ) -> VisionResult<FaceLandmarkPredictor<E>> {
        let (config, _) = self.state.into_parts();
        FaceLandmarkPredictor::from_config(&config, engine)
    }
}

impl Default for FaceLandmarkPredictorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
