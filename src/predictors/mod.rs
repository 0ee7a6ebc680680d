//! Predictors module
//!
//! High-level predictor APIs, one per task family. Each predictor composes a
//! preprocessing pipeline, an execution engine and a decoder, and exposes a
//! simple interface for model loading, configuration and prediction.
//!
//! Predictors own their engine exclusively. Calls that run the engine take
//! `&mut self`; share a predictor across threads behind a `Mutex`, or build
//! one per thread.

#[macro_use]
mod builder;
mod core;

pub use builder::{PredictorBuilderState, TaskPredictorBuilder};
pub use self::core::ModelCore;

pub mod face_landmark;
pub mod image_classification;
pub mod object_detection;
pub mod pose_detection;
pub mod vision_model;

pub use face_landmark::{FaceLandmarkPredictor, FaceLandmarkPredictorBuilder};
pub use image_classification::{ImageClassificationPredictor, ImageClassificationPredictorBuilder};
pub use object_detection::{ObjectDetectionPredictor, ObjectDetectionPredictorBuilder};
pub use pose_detection::{
    MultiPoseDetectionPredictor, MultiPoseDetectionPredictorBuilder, PoseDetectionPredictor,
    PoseDetectionPredictorBuilder,
};
pub use vision_model::VisionModel;
