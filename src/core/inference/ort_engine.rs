//! ONNX Runtime implementation of [`InferenceEngine`].

use crate::core::config::onnx::{OrtGraphOptimizationLevel, OrtSessionConfig};
use crate::core::errors::{VisionError, VisionResult};
use crate::core::inference::InferenceEngine;
use crate::core::tensor::{FloatTensor, OutputTensors};
use ndarray::{ArrayD, IxDyn};
use ort::logging::LogLevel;
use ort::session::Session;
use ort::session::builder::SessionBuilder;
use ort::value::TensorRef;
use std::fmt;
use std::path::{Path, PathBuf};

/// Loads an ONNX session with default settings.
pub fn load_session(model_path: impl AsRef<Path>) -> VisionResult<Session> {
    let session = Session::builder()?
        .with_log_level(LogLevel::Error)?
        .commit_from_file(model_path.as_ref())?;
    Ok(session)
}

/// One ONNX Runtime session plus the tensor names it is driven with.
///
/// The session is released when the engine is dropped.
pub struct OrtEngine {
    session: Session,
    input_name: String,
    output_names: Vec<String>,
    model_path: PathBuf,
    model_name: String,
}

impl fmt::Debug for OrtEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrtEngine")
            .field("input_name", &self.input_name)
            .field("output_names", &self.output_names)
            .field("model_path", &self.model_path)
            .field("model_name", &self.model_name)
            .finish()
    }
}

impl OrtEngine {
    /// Creates an engine with default ONNX Runtime settings.
    pub fn from_file(model_path: impl AsRef<Path>) -> VisionResult<Self> {
        Self::with_config(model_path, &OrtSessionConfig::default())
    }

    /// Creates an engine, applying the given session configuration.
    ///
    /// # Errors
    ///
    /// Returns the ONNX Runtime error unchanged if the session cannot be built,
    /// or a configuration error if the model declares no input.
    pub fn with_config(
        model_path: impl AsRef<Path>,
        config: &OrtSessionConfig,
    ) -> VisionResult<Self> {
        let path = model_path.as_ref();
        let builder = Session::builder()?.with_log_level(LogLevel::Error)?;
        let session = Self::apply_config(builder, config)?.commit_from_file(path)?;

        let input_name = match &config.input_name {
            Some(name) => name.clone(),
            None => session
                .inputs
                .first()
                .map(|input| input.name.clone())
                .ok_or_else(|| {
                    VisionError::config_error(format!(
                        "model '{}' declares no inputs",
                        path.display()
                    ))
                })?,
        };
        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        let model_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown_model")
            .to_string();

        tracing::info!(
            "Loaded ONNX model '{}': input '{}', outputs {:?}",
            model_name,
            input_name,
            output_names
        );

        Ok(Self {
            session,
            input_name,
            output_names,
            model_path: path.to_path_buf(),
            model_name,
        })
    }

    fn apply_config(
        mut builder: SessionBuilder,
        config: &OrtSessionConfig,
    ) -> Result<SessionBuilder, ort::Error> {
        if let Some(intra) = config.intra_threads {
            builder = builder.with_intra_threads(intra)?;
        }
        if let Some(inter) = config.inter_threads {
            builder = builder.with_inter_threads(inter)?;
        }
        if let Some(level) = config.optimization_level {
            use ort::session::builder::GraphOptimizationLevel as GOL;
            let mapped = match level {
                OrtGraphOptimizationLevel::DisableAll => GOL::Disable,
                OrtGraphOptimizationLevel::Level1 => GOL::Level1,
                OrtGraphOptimizationLevel::Level2 => GOL::Level2,
                OrtGraphOptimizationLevel::Level3 => GOL::Level3,
            };
            builder = builder.with_optimization_level(mapped)?;
        }
        Ok(builder)
    }

    /// Name of the fed input tensor.
    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    /// Names of the extracted output tensors, in session order.
    pub fn output_names(&self) -> &[String] {
        &self.output_names
    }

    /// The model path associated with this engine.
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl InferenceEngine for OrtEngine {
    fn execute(&mut self, input: &FloatTensor) -> VisionResult<OutputTensors> {
        let view = input.view()?;
        let tensor = TensorRef::from_array_view(view)?;
        let inputs = ort::inputs![self.input_name.as_str() => tensor];
        let outputs = self.session.run(inputs)?;

        let mut result = OutputTensors::new();
        for name in &self.output_names {
            let (shape, data) = outputs[name.as_str()].try_extract_tensor::<f32>()?;
            let dims: Vec<usize> = shape.iter().map(|&d| d.max(0) as usize).collect();
            let array = ArrayD::from_shape_vec(IxDyn(&dims), data.to_vec())?;
            result.insert(name.clone(), array);
        }

        tracing::debug!(
            "{}: input {} -> {} output(s)",
            self.model_name,
            input.shape(),
            result.len()
        );
        Ok(result)
    }

    fn engine_info(&self) -> String {
        format!("onnxruntime:{}", self.model_name)
    }
}
