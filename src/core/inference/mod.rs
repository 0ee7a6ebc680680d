//! The execution engine seam.
//!
//! The engine is a black box: given the preprocessed tensor it returns named
//! output tensors. Most engine sessions cannot run concurrently on one handle,
//! so [`InferenceEngine::execute`] takes `&mut self`. A predictor owns exactly
//! one engine; callers that want parallel inference open one predictor per
//! thread or serialize access themselves.

pub mod ort_engine;

pub use ort_engine::{OrtEngine, load_session};

use crate::core::errors::VisionResult;
use crate::core::tensor::{FloatTensor, OutputTensors};
use std::fmt::Debug;

/// Runs a loaded network on one input tensor.
pub trait InferenceEngine: Send + Debug {
    /// Executes the network.
    ///
    /// `input` already carries its batch dimension. Engine failures are
    /// returned unchanged in [`VisionError::Session`](crate::core::VisionError::Session)
    /// or [`VisionError::Engine`](crate::core::VisionError::Engine).
    fn execute(&mut self, input: &FloatTensor) -> VisionResult<OutputTensors>;

    /// Short description used in logs.
    fn engine_info(&self) -> String;
}

impl<E: InferenceEngine + ?Sized> InferenceEngine for Box<E> {
    fn execute(&mut self, input: &FloatTensor) -> VisionResult<OutputTensors> {
        (**self).execute(input)
    }

    fn engine_info(&self) -> String {
        (**self).engine_info()
    }
}
