//! Exact-size image resizing.

use crate::core::config::transform::Interpolation;
use crate::core::errors::{VisionError, VisionResult};
use crate::core::operation::Operation;
use crate::core::shape::TensorShape;
use crate::domain::image::ImageFrame;

/// Resizes a frame to fixed output dimensions.
///
/// Width and height scale independently, so the aspect ratio is not kept.
/// The channel count and color mode are unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Resize {
    width: u32,
    height: u32,
    interpolation: Interpolation,
}

impl Resize {
    /// Creates a resize stage.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if either dimension is zero.
    pub fn new(width: u32, height: u32, interpolation: Interpolation) -> VisionResult<Self> {
        if width == 0 || height == 0 {
            return Err(VisionError::config_error_with_context(
                "resize",
                &format!("{}x{}", width, height),
                "output dimensions must be greater than 0",
            ));
        }
        Ok(Self {
            width,
            height,
            interpolation,
        })
    }

    /// Creates a bilinear resize stage.
    pub fn bilinear(width: u32, height: u32) -> VisionResult<Self> {
        Self::new(width, height, Interpolation::Bilinear)
    }

    /// Output size as `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Operation<ImageFrame, ImageFrame> for Resize {
    fn apply(&self, frame: ImageFrame) -> VisionResult<ImageFrame> {
        if frame.width() == self.width && frame.height() == self.height {
            return Ok(frame);
        }
        let (image, mode) = frame.into_parts();
        let resized = image.resize_exact(self.width, self.height, self.interpolation.filter_type());
        Ok(ImageFrame::with_parts(resized, mode))
    }

    fn transform_shape(&self, shape: TensorShape) -> VisionResult<TensorShape> {
        if shape.rank() != 3 {
            return Err(VisionError::shape_error(format!(
                "resize expects an [H, W, C] image shape, got {}",
                shape
            )));
        }
        Ok(shape
            .replace_dim(0, self.height as usize)
            .replace_dim(1, self.width as usize))
    }

    fn name(&self) -> String {
        format!("Resize({}x{})", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::image::ColorMode;
    use image::{GrayImage, RgbImage};

    #[test]
    fn test_non_uniform_scale() {
        let frame = ImageFrame::from_rgb(RgbImage::new(640, 480));
        let out = Resize::bilinear(192, 256).unwrap().apply(frame).unwrap();
        assert_eq!((out.width(), out.height()), (192, 256));
        assert_eq!(out.channels(), 3);
    }

    #[test]
    fn test_keeps_mode() {
        let frame = ImageFrame::from_raw(4, 4, ColorMode::Bgr, vec![9; 48]).unwrap();
        let out = Resize::new(2, 2, Interpolation::Nearest).unwrap().apply(frame).unwrap();
        assert_eq!(out.mode(), ColorMode::Bgr);

        let frame = ImageFrame::from_gray(GrayImage::new(3, 3));
        let out = Resize::bilinear(5, 1).unwrap().apply(frame).unwrap();
        assert_eq!(out.shape(), TensorShape::known(&[1, 5, 1]));
    }

    #[test]
    fn test_shape_transform() {
        let op = Resize::bilinear(300, 200).unwrap();
        let shape = op.transform_shape(TensorShape::known(&[480, 640, 3])).unwrap();
        assert_eq!(shape, TensorShape::known(&[200, 300, 3]));
        assert!(op.transform_shape(TensorShape::known(&[3, 4])).unwrap_err().is_shape());
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(Resize::bilinear(0, 10).unwrap_err().is_configuration());
    }
}
