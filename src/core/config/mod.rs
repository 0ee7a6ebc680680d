//! Configuration types.
//!
//! - [`transform`] describes preprocessing stages.
//! - [`model`] ties preprocessing and a decoder into one loadable model description.
//! - [`onnx`] holds ONNX Runtime session options.

pub mod model;
pub mod onnx;
pub mod transform;

pub use model::ModelConfig;
pub use onnx::{OrtGraphOptimizationLevel, OrtSessionConfig};
pub use transform::{Interpolation, TransformConfig};
