//! The core module of the vision pipeline.
//!
//! This module contains the fundamental building blocks:
//! - Shapes and tensors exchanged between stages
//! - The [`Operation`] composition primitive and [`Pipeline`]
//! - Configuration management
//! - Constants used throughout the crate
//! - Error handling
//! - The execution engine seam
//!
//! It also re-exports the commonly used types for convenience.

pub mod config;
pub mod constants;
pub mod errors;
pub mod inference;
pub mod operation;
pub mod pipeline;
pub mod shape;
pub mod task;
pub mod tensor;

pub use config::{
    Interpolation, ModelConfig, OrtGraphOptimizationLevel, OrtSessionConfig, TransformConfig,
};
pub use constants::*;
pub use errors::{VisionError, VisionResult};
pub use inference::{InferenceEngine, OrtEngine, load_session};
pub use operation::{Chain, FnOperation, Identity, Operation, OperationExt, compose, from_fn};
pub use pipeline::Pipeline;
pub use shape::{TensorShape, UNKNOWN_DIM};
pub use task::TaskType;
pub use tensor::{FloatTensor, OutputTensors};

/// Initializes the tracing subscriber for logging.
///
/// Sets up a registry with an environment filter (`RUST_LOG`) and a
/// formatting layer. Call it once at the start of an application.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
