//! Facial landmark and classification results.

use serde::{Deserialize, Serialize};

/// A 2-D facial point normalized to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
}

/// One ranked class from a classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Class index in the model output.
    pub index: usize,
    /// Class label.
    pub label: String,
    /// Score as emitted by the model.
    pub probability: f32,
}
