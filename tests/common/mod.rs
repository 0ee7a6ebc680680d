//! Shared helpers for integration tests.

#![allow(dead_code)]

use ndarray::{ArrayD, IxDyn};
use oar_vision::core::{FloatTensor, InferenceEngine, OutputTensors, VisionError, VisionResult};
use std::fmt;
use std::sync::{Arc, Mutex};

/// Deterministic engine: records every input and returns canned outputs.
pub struct MockEngine {
    outputs: OutputTensors,
    fail_with: Option<String>,
    inputs: Arc<Mutex<Vec<FloatTensor>>>,
}

impl fmt::Debug for MockEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockEngine")
            .field("outputs", &self.outputs.names())
            .finish()
    }
}

#[derive(Debug)]
struct MockFailure(String);

impl fmt::Display for MockFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mock engine rejected input: {}", self.0)
    }
}

impl std::error::Error for MockFailure {}

impl MockEngine {
    /// Returns `outputs` for every call; the recorder sees every input.
    pub fn new(outputs: OutputTensors) -> (Self, Arc<Mutex<Vec<FloatTensor>>>) {
        let inputs = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                outputs,
                fail_with: None,
                inputs: Arc::clone(&inputs),
            },
            inputs,
        )
    }

    /// Fails every call with an engine error.
    pub fn failing(message: &str) -> Self {
        Self {
            outputs: OutputTensors::new(),
            fail_with: Some(message.to_string()),
            inputs: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl InferenceEngine for MockEngine {
    fn execute(&mut self, input: &FloatTensor) -> VisionResult<OutputTensors> {
        self.inputs.lock().unwrap().push(input.clone());
        if let Some(message) = &self.fail_with {
            return Err(VisionError::engine_error(MockFailure(message.clone())));
        }
        Ok(self.outputs.clone())
    }

    fn engine_info(&self) -> String {
        "mock".to_string()
    }
}

/// Builds an output array from a shape and flat values.
pub fn array(shape: &[usize], values: Vec<f32>) -> ArrayD<f32> {
    ArrayD::from_shape_vec(IxDyn(shape), values).unwrap()
}

/// Asserts two floats are within `eps`.
pub fn assert_close(actual: f32, expected: f32, eps: f32) {
    assert!(
        (actual - expected).abs() <= eps,
        "expected {expected}, got {actual}"
    );
}
