//! Dense facial landmark decoding.

use crate::core::errors::{VisionError, VisionResult};
use crate::core::task::TaskType;
use crate::core::tensor::OutputTensors;
use crate::domain::landmark::Landmark;
use crate::processors::decode::{Decoder, flat_output};
use serde::{Deserialize, Serialize};

/// Decodes a flat `[x0, y0, x1, y1, ...]` vector in `[-1, 1]` into points in `[0, 1]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkDecoder {
    /// Output holding the points; the first output when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_name: Option<String>,
    /// Expected number of points; any even length is accepted when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_points: Option<usize>,
}

impl LandmarkDecoder {
    /// Creates a decoder expecting `num_points` points.
    pub fn new(num_points: usize) -> Self {
        Self {
            output_name: None,
            num_points: Some(num_points),
        }
    }

    /// Reads points from a named output.
    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    pub(crate) fn validate(&self) -> VisionResult<()> {
        if self.num_points == Some(0) {
            return Err(VisionError::config_error(
                "landmark decoder needs at least one point",
            ));
        }
        Ok(())
    }
}

/// Maps a network output in `[-1, 1]` onto `[0, 1]`.
fn remap(v: f32) -> f32 {
    (1.0 + v) / 2.0
}

impl Decoder for LandmarkDecoder {
    type Output = Vec<Landmark>;

    fn decode(&self, outputs: &OutputTensors) -> VisionResult<Vec<Landmark>> {
        let values = flat_output(
            outputs,
            self.output_name.as_deref(),
            self.num_points.map(|n| n * 2),
        )?;
        if values.len() % 2 != 0 {
            return Err(VisionError::decode_error(format!(
                "landmark output has an odd number of values ({})",
                values.len()
            )));
        }
        Ok(values
            .chunks_exact(2)
            .map(|xy| Landmark {
                x: remap(xy[0]),
                y: remap(xy[1]),
            })
            .collect())
    }

    fn task_type(&self) -> TaskType {
        TaskType::LandmarkDetection
    }
}
