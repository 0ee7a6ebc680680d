//! Per-channel mean/std normalization.
//!
//! The transform is precomputed as `x * alpha[c] + beta[c]` with
//! `alpha = 1 / std` and `beta = -mean / std`, which is the same as
//! `(x - mean[c]) / std[c]`.

use crate::core::errors::{VisionError, VisionResult};
use crate::core::operation::Operation;
use crate::core::shape::TensorShape;
use crate::core::tensor::FloatTensor;
use crate::processors::types::ChannelOrder;

/// Normalizes a tensor channel by channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalize {
    mean: Vec<f32>,
    std: Vec<f32>,
    /// Scaling factors for each channel (alpha = 1 / std)
    alpha: Vec<f32>,
    /// Offset values for each channel (beta = -mean / std)
    beta: Vec<f32>,
    order: ChannelOrder,
}

impl Normalize {
    /// Creates a normalization stage.
    ///
    /// # Arguments
    ///
    /// * `mean` - Mean value for each channel
    /// * `std` - Standard deviation for each channel
    /// * `order` - Where the channel axis sits in the incoming tensor
    ///
    /// # Errors
    ///
    /// Returns a configuration error if:
    /// * `mean` is empty or its length differs from `std`
    /// * Any standard deviation is not finite and greater than 0
    /// * Any mean is not finite
    pub fn new(mean: Vec<f32>, std: Vec<f32>, order: ChannelOrder) -> VisionResult<Self> {
        if mean.is_empty() {
            return Err(VisionError::config_error(
                "normalize needs at least one channel",
            ));
        }
        if mean.len() != std.len() {
            return Err(VisionError::config_error(format!(
                "normalize mean has {} values but std has {}",
                mean.len(),
                std.len()
            )));
        }
        for (i, &s) in std.iter().enumerate() {
            if !s.is_finite() || s <= 0.0 {
                return Err(VisionError::config_error(format!(
                    "Standard deviation at index {i} must be greater than 0, got {s}"
                )));
            }
        }
        if let Some(m) = mean.iter().find(|m| !m.is_finite()) {
            return Err(VisionError::config_error(format!(
                "normalize mean must be finite, got {m}"
            )));
        }

        let alpha = std.iter().map(|s| 1.0 / s).collect();
        let beta = mean.iter().zip(&std).map(|(m, s)| -m / s).collect();
        Ok(Self {
            mean,
            std,
            alpha,
            beta,
            order,
        })
    }

    /// Number of channels this stage normalizes.
    pub fn channels(&self) -> usize {
        self.mean.len()
    }

    /// Expected channel order.
    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    /// Mean values.
    pub fn mean(&self) -> &[f32] {
        &self.mean
    }

    /// Standard deviations.
    pub fn std(&self) -> &[f32] {
        &self.std
    }

    fn check_channels(&self, shape: &TensorShape) -> VisionResult<usize> {
        let axis = self.order.channel_axis(shape.rank()).ok_or_else(|| {
            VisionError::shape_error(format!("cannot normalize a tensor of shape {}", shape))
        })?;
        let channels = shape.dim(axis).ok_or_else(|| {
            VisionError::shape_error(format!(
                "channel dimension of {} is unknown",
                shape
            ))
        })?;
        if channels != self.channels() {
            return Err(VisionError::config_error(format!(
                "normalize has {} mean/std values but the tensor {} ({:?}) has {} channels",
                self.channels(),
                shape,
                self.order,
                channels
            )));
        }
        Ok(channels)
    }
}

impl Operation<FloatTensor, FloatTensor> for Normalize {
    fn apply(&self, tensor: FloatTensor) -> VisionResult<FloatTensor> {
        let channels = self.check_channels(tensor.shape())?;
        let (mut data, shape) = tensor.into_parts();
        match self.order {
            ChannelOrder::HWC => {
                for pixel in data.chunks_exact_mut(channels) {
                    for (c, v) in pixel.iter_mut().enumerate() {
                        *v = *v * self.alpha[c] + self.beta[c];
                    }
                }
            }
            ChannelOrder::CHW => {
                let plane = data.len() / channels;
                for (c, chunk) in data.chunks_exact_mut(plane.max(1)).enumerate() {
                    let (a, b) = (self.alpha[c], self.beta[c]);
                    chunk.iter_mut().for_each(|v| *v = *v * a + b);
                }
            }
        }
        FloatTensor::new(data, shape)
    }

    fn transform_shape(&self, shape: TensorShape) -> VisionResult<TensorShape> {
        self.check_channels(&shape)?;
        Ok(shape)
    }

    fn name(&self) -> String {
        format!("Normalize({:?})", self.order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tensor(data: Vec<f32>, dims: &[usize]) -> FloatTensor {
        FloatTensor::new(data, TensorShape::known(dims)).unwrap()
    }

    #[test]
    fn test_chw_per_channel() {
        let op = Normalize::new(vec![1.0, 2.0], vec![1.0, 0.5], ChannelOrder::CHW).unwrap();
        let out = op.apply(tensor(vec![1.0, 3.0, 2.0, 4.0], &[2, 1, 2])).unwrap();
        assert_eq!(out.data(), &[0.0, 2.0, 0.0, 4.0]);
    }

    #[test]
    fn test_hwc_per_channel() {
        let op = Normalize::new(vec![1.0, 2.0], vec![1.0, 0.5], ChannelOrder::HWC).unwrap();
        let out = op.apply(tensor(vec![1.0, 2.0, 3.0, 4.0], &[1, 2, 2])).unwrap();
        assert_eq!(out.data(), &[0.0, 0.0, 2.0, 4.0]);
    }

    #[test]
    fn test_channel_mismatch_is_configuration_error() {
        let op = Normalize::new(
            vec![0.485, 0.456, 0.406],
            vec![0.229, 0.224, 0.225],
            ChannelOrder::CHW,
        )
        .unwrap();
        let gray = tensor(vec![0.5; 4], &[1, 2, 2]);
        assert!(op.apply(gray).unwrap_err().is_configuration());
        let err = op
            .transform_shape(TensorShape::known(&[1, 2, 2]))
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(Normalize::new(vec![], vec![], ChannelOrder::CHW).is_err());
        assert!(Normalize::new(vec![0.5, 0.5], vec![0.5], ChannelOrder::CHW).is_err());
        assert!(Normalize::new(vec![0.5], vec![0.0], ChannelOrder::HWC)
            .unwrap_err()
            .is_configuration());
    }
}
