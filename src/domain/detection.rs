//! Object detection results.

use serde::{Deserialize, Serialize};

/// One detected bounding box.
///
/// Box edges are normalized to `[0, 1]` relative to the input image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    /// Class label.
    pub label: String,
    /// Detection confidence in `[0, 1]`.
    pub probability: f32,
    /// Top edge.
    pub y_min: f32,
    /// Left edge.
    pub x_min: f32,
    /// Bottom edge.
    pub y_max: f32,
    /// Right edge.
    pub x_max: f32,
}

impl DetectedObject {
    /// Creates a detection from a label, a probability and `[y_min, x_min, y_max, x_max]`.
    pub fn new(label: impl Into<String>, probability: f32, bbox: [f32; 4]) -> Self {
        Self {
            label: label.into(),
            probability,
            y_min: bbox[0],
            x_min: bbox[1],
            y_max: bbox[2],
            x_max: bbox[3],
        }
    }

    /// Box width as a fraction of the image width.
    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    /// Box height as a fraction of the image height.
    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    /// Box edges in pixels for an image of the given size, as `(x_min, y_min, x_max, y_max)`.
    pub fn to_pixels(&self, width: u32, height: u32) -> (f32, f32, f32, f32) {
        let (w, h) = (width as f32, height as f32);
        (self.x_min * w, self.y_min * h, self.x_max * w, self.y_max * h)
    }
}
