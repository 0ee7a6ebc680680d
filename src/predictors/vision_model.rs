//! Configuration-driven model of any task family.

use super::builder::open_engine;
use super::core::ModelCore;
use crate::core::config::{ModelConfig, OrtSessionConfig};
use crate::core::errors::VisionResult;
use crate::core::inference::{InferenceEngine, OrtEngine};
use crate::core::task::TaskType;
use crate::domain::image::ImageSource;
use crate::processors::decode::{Decoder, Prediction, TaskDecoder};
use std::path::Path;

/// A model whose task family is chosen by its [`ModelConfig`].
///
/// ```rust,no_run
/// use oar_vision::prelude::*;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ModelConfig::from_json_file("pose.json")?;
/// let mut model = VisionModel::open(config, "movenet.onnx", None)?;
/// if let Prediction::Pose(pose) = model.predict("person.jpg")? {
///     println!("{} landmarks", pose.landmarks().len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct VisionModel<E: InferenceEngine = OrtEngine> {
    config: ModelConfig,
    core: ModelCore<E, TaskDecoder>,
}

impl VisionModel {
    /// Opens `model_path` with ONNX Runtime.
    pub fn open(
        config: ModelConfig,
        model_path: impl AsRef<Path>,
        ort_config: Option<OrtSessionConfig>,
    ) -> VisionResult<Self> {
        let engine = open_engine(&config, ort_config, model_path.as_ref())?;
        Self::new(config, engine)
    }
}

impl<E: InferenceEngine> VisionModel<E> {
    /// Validates `config` and composes it with `engine`.
    pub fn new(config: ModelConfig, engine: E) -> VisionResult<Self> {
        config.validate()?;
        let core = ModelCore::new(config.build_preprocessor()?, engine, config.decoder.clone());
        Ok(Self { config, core })
    }

    /// The configuration this model was built from.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// The configured task family.
    pub fn task_type(&self) -> TaskType {
        self.core.decoder().task_type()
    }

    /// Runs the model on one image.
    pub fn predict(&mut self, image: impl Into<ImageSource>) -> VisionResult<Prediction> {
        self.core.run(image, |decoder, outputs| decoder.decode(outputs))
    }

    /// Runs the model on several images, one result per image.
    pub fn predict_batch<S: Into<ImageSource>>(
        &mut self,
        images: Vec<S>,
    ) -> Vec<VisionResult<Prediction>> {
        self.core
            .run_batch(images, |decoder, outputs| decoder.decode(outputs))
    }

    /// The shared core.
    pub fn core(&self) -> &ModelCore<E, TaskDecoder> {
        &self.core
    }
}
