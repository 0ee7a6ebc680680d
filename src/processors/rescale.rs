//! Linear rescaling of tensor values.

use crate::core::constants::DEFAULT_RESCALE_COEFFICIENT;
use crate::core::errors::{VisionError, VisionResult};
use crate::core::operation::Operation;
use crate::core::tensor::FloatTensor;

/// Multiplies every element by `1 / coefficient`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rescale {
    coefficient: f32,
    factor: f32,
}

impl Rescale {
    /// Creates a rescale stage.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `coefficient` is not a finite value
    /// greater than zero.
    pub fn new(coefficient: f32) -> VisionResult<Self> {
        if !coefficient.is_finite() || coefficient <= 0.0 {
            return Err(VisionError::config_error_with_context(
                "rescale.coefficient",
                &coefficient.to_string(),
                "must be finite and greater than 0",
            ));
        }
        Ok(Self {
            coefficient,
            factor: 1.0 / coefficient,
        })
    }

    /// The divisor.
    pub fn coefficient(&self) -> f32 {
        self.coefficient
    }
}

impl Default for Rescale {
    fn default() -> Self {
        Self {
            coefficient: DEFAULT_RESCALE_COEFFICIENT,
            factor: 1.0 / DEFAULT_RESCALE_COEFFICIENT,
        }
    }
}

impl Operation<FloatTensor, FloatTensor> for Rescale {
    fn apply(&self, tensor: FloatTensor) -> VisionResult<FloatTensor> {
        let factor = self.factor;
        Ok(tensor.map(|v| v * factor))
    }

    fn name(&self) -> String {
        format!("Rescale({})", self.coefficient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shape::TensorShape;

    #[test]
    fn test_default_maps_bytes_to_unit_range() {
        let samples: Vec<f32> = (0..=255).map(|v| v as f32).collect();
        let t = FloatTensor::new(samples, TensorShape::known(&[256])).unwrap();
        let out = Rescale::default().apply(t).unwrap();
        assert_eq!(out.data()[0], 0.0);
        assert!((out.data()[255] - 1.0).abs() < 1e-6);
        for (i, v) in out.data().iter().enumerate() {
            let recovered = (v * 255.0).round() as i32;
            assert!((recovered - i as i32).abs() <= 1);
        }
    }

    #[test]
    fn test_rejects_bad_coefficient() {
        assert!(Rescale::new(0.0).unwrap_err().is_configuration());
        assert!(Rescale::new(f32::NAN).unwrap_err().is_configuration());
        assert!(Rescale::new(127.5).is_ok());
    }
}
