//! Flattening a pixel grid into a float tensor.

use crate::core::errors::{VisionError, VisionResult};
use crate::core::operation::Operation;
use crate::core::shape::TensorShape;
use crate::core::tensor::FloatTensor;
use crate::domain::image::ImageFrame;
use crate::processors::types::ChannelOrder;

/// Converts an 8-bit frame into `f32` samples plus their shape.
///
/// Values are not rescaled: a sample of 255 becomes `255.0`. With
/// [`ChannelOrder::CHW`] the output shape is `[C, H, W]`, with
/// [`ChannelOrder::HWC`] it is `[H, W, C]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToTensor {
    order: ChannelOrder,
}

impl ToTensor {
    /// Creates a flattening stage with the given channel order.
    pub fn new(order: ChannelOrder) -> Self {
        Self { order }
    }

    /// Channel order of the produced tensor.
    pub fn order(&self) -> ChannelOrder {
        self.order
    }
}

impl Operation<ImageFrame, FloatTensor> for ToTensor {
    fn apply(&self, frame: ImageFrame) -> VisionResult<FloatTensor> {
        let (h, w, c) = (
            frame.height() as usize,
            frame.width() as usize,
            frame.channels(),
        );
        let samples = frame.samples();
        match self.order {
            ChannelOrder::HWC => {
                let data = samples.iter().map(|&v| v as f32).collect();
                FloatTensor::new(data, TensorShape::known(&[h, w, c]))
            }
            ChannelOrder::CHW => {
                let plane = h * w;
                let mut data = vec![0.0f32; c * plane];
                for (i, pixel) in samples.chunks_exact(c).enumerate() {
                    for (ch, &v) in pixel.iter().enumerate() {
                        data[ch * plane + i] = v as f32;
                    }
                }
                FloatTensor::new(data, TensorShape::known(&[c, h, w]))
            }
        }
    }

    fn transform_shape(&self, shape: TensorShape) -> VisionResult<TensorShape> {
        let dims = shape.dims();
        if dims.len() != 3 {
            return Err(VisionError::shape_error(format!(
                "to_tensor expects an [H, W, C] image shape, got {}",
                shape
            )));
        }
        match self.order {
            ChannelOrder::HWC => Ok(shape),
            ChannelOrder::CHW => TensorShape::new(vec![dims[2], dims[0], dims[1]]),
        }
    }

    fn name(&self) -> String {
        format!("ToTensor({:?})", self.order)
    }
}
