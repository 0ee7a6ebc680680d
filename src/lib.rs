//! # OAR Vision
//!
//! Pretrained-model inference for vision tasks using ONNX models: image
//! classification, SSD-style object detection, single- and multi-person pose
//! estimation, and dense facial landmarks.
//!
//! ## Features
//!
//! - Composable preprocessing: typed [`Operation`](core::Operation)s chained
//!   into pipelines with static shape propagation
//! - Post-processing decoders that turn raw output tensors into boxes,
//!   keypoints and landmarks
//! - Declarative JSON model configuration
//! - Ready-made presets for SSD-MobileNet, MoveNet and 2D106 face alignment
//! - Batch processing with parallel preprocessing
//! - ONNX Runtime integration behind a pluggable engine trait
//!
//! ## Modules
//!
//! * [`core`] - Operations, pipelines, shapes, configuration, errors and the engine seam
//! * [`domain`] - Images, label tables and result types
//! * [`processors`] - Image transforms and output decoders
//! * [`models`] - Preset model configurations
//! * [`predictors`] - Task-level predictors
//! * [`utils`] - Image loading
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use oar_vision::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut detector = ObjectDetectionPredictor::builder()
//!     .score_threshold(0.6)
//!     .build("models/ssd_mobilenet_v1.onnx")?;
//!
//! for object in detector.detect_objects("street.jpg", Some(5), None)? {
//!     println!(
//!         "{} {:.2} [{:.3}, {:.3}, {:.3}, {:.3}]",
//!         object.label, object.probability, object.y_min, object.x_min, object.y_max, object.x_max
//!     );
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Composing operations
//!
//! ```rust
//! use oar_vision::prelude::*;
//! use oar_vision::processors::{ColorConvert, Resize};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let stage = Resize::bilinear(64, 32)?.then(ColorConvert::new(ColorMode::Grayscale));
//! let shape = stage.transform_shape(TensorShape::known(&[480, 640, 3]))?;
//! assert_eq!(shape, TensorShape::known(&[32, 64, 1]));
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod domain;
pub mod models;
pub mod predictors;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// ```rust
/// use oar_vision::prelude::*;
/// ```
///
/// Included items cover the common tasks:
/// - Predictors and the configuration-driven [`VisionModel`](crate::predictors::VisionModel)
/// - Configuration (`ModelConfig`, `TransformConfig`, `OrtSessionConfig`)
/// - Composition (`Operation`, `OperationExt`, `Pipeline`, `TensorShape`)
/// - Result types and errors
/// - Basic image loading (`load_image`)
pub mod prelude {
    pub use crate::core::{
        FloatTensor, InferenceEngine, ModelConfig, Operation, OperationExt, OrtSessionConfig,
        OutputTensors, Pipeline, TaskType, TensorShape, TransformConfig, VisionError,
        VisionResult,
    };
    pub use crate::domain::{
        Classification, ColorMode, DetectedObject, DetectedPose, ImageFrame, ImageSource,
        LabelMap, Landmark, MultiPoseDetectionResult, PoseLandmark,
    };
    pub use crate::predictors::{
        FaceLandmarkPredictor, ImageClassificationPredictor, MultiPoseDetectionPredictor,
        ObjectDetectionPredictor, PoseDetectionPredictor, VisionModel,
    };
    pub use crate::processors::{Decoder, Prediction};
    pub use crate::utils::{load_image, load_images};
}
