//! Image Classification Predictor

use super::builder::{PredictorBuilderState, open_engine};
use super::core::ModelCore;
use crate::core::config::ModelConfig;
use crate::core::errors::VisionResult;
use crate::core::inference::{InferenceEngine, OrtEngine};
use crate::domain::image::ImageSource;
use crate::domain::labels::LabelMap;
use crate::domain::landmark::Classification;
use crate::models::imagenet::{InputType, classifier};
use crate::processors::decode::ClassificationDecoder;
use std::path::Path;

/// Image classification predictor.
#[derive(Debug)]
pub struct ImageClassificationPredictor<E: InferenceEngine = OrtEngine> {
    core: ModelCore<E, ClassificationDecoder>,
}

impl ImageClassificationPredictor {
    /// Starts a builder for an ImageNet-style classifier with the given labels.
    pub fn builder(input_type: InputType, labels: LabelMap) -> ImageClassificationPredictorBuilder {
        ImageClassificationPredictorBuilder::new(input_type, labels)
    }
}

impl<E: InferenceEngine> ImageClassificationPredictor<E> {
    /// Builds a predictor from a configuration and an already opened engine.
    pub fn from_config(config: &ModelConfig, engine: E) -> VisionResult<Self> {
        config.validate()?;
        let decoder = expect_decoder!(config, Classification, "classification");
        Ok(Self {
            core: ModelCore::new(config.build_preprocessor()?, engine, decoder),
        })
    }

    /// Returns the label of the most probable class.
    pub fn predict_object(&mut self, image: impl Into<ImageSource>) -> VisionResult<String> {
        self.core
            .run(image, |decoder, outputs| decoder.argmax(outputs))
            .map(|class| class.label)
    }

    /// Returns the `k` most probable classes, ties broken by lower class index.
    pub fn predict_top_k_objects(
        &mut self,
        image: impl Into<ImageSource>,
        k: usize,
    ) -> VisionResult<Vec<Classification>> {
        self.core
            .run(image, |decoder, outputs| decoder.top_k(outputs, k))
    }

    /// Returns the most probable label of every image.
    pub fn predict_object_batch<S: Into<ImageSource>>(
        &mut self,
        images: Vec<S>,
    ) -> Vec<VisionResult<String>> {
        self.core.run_batch(images, |decoder, outputs| {
            decoder.argmax(outputs).map(|class| class.label)
        })
    }

    /// Returns the `k` most probable classes of every image.
    pub fn predict_top_k_objects_batch<S: Into<ImageSource>>(
        &mut self,
        images: Vec<S>,
        k: usize,
    ) -> Vec<VisionResult<Vec<Classification>>> {
        self.core
            .run_batch(images, |decoder, outputs| decoder.top_k(outputs, k))
    }

    /// The shared core.
    pub fn core(&self) -> &ModelCore<E, ClassificationDecoder> {
        &self.core
    }
}

/// Builder for [`ImageClassificationPredictor`].
#[derive(Debug, Clone)]
pub struct ImageClassificationPredictorBuilder {
    state: PredictorBuilderState<ModelConfig>,
}

impl_task_predictor_builder!(ImageClassificationPredictorBuilder, ModelConfig);

impl ImageClassificationPredictorBuilder {
    /// Creates a builder for a 224 x 224 classifier.
    pub fn new(input_type: InputType, labels: LabelMap) -> Self {
        Self {
            state: PredictorBuilderState::new(classifier("classifier", input_type, labels)),
        }
    }

    /// Sets the model name used in logs.
    pub fn model_name(mut self, name: impl Into<String>) -> Self {
        self.state.config_mut().model_name = name.into();
        self
    }

    /// Opens the model with ONNX Runtime.
    pub fn build<P: AsRef<Path>>(
        self,
        model_path: P,
    ) -> VisionResult<ImageClassificationPredictor> {
        let (config, ort_config) = self.state.into_parts();
        let engine = open_engine(&config, ort_config, model_path.as_ref())?;
        ImageClassificationPredictor::from_config(&config, engine)
    }

    /// Uses a caller-supplied engine.
    pub fn build_with_engine<E: InferenceEngine>(
        self,
        engine: E,
    ) -> VisionResult<ImageClassificationPredictor<E>> {
        let (config, _) = self.state.into_parts();
        ImageClassificationPredictor::from_config(&config, engine)
    }
}
