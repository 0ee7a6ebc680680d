//! Color mode conversion between RGB, BGR and grayscale.

use crate::core::errors::{VisionError, VisionResult};
use crate::core::operation::Operation;
use crate::core::shape::TensorShape;
use crate::domain::image::{ColorMode, ImageFrame};
use image::{DynamicImage, RgbImage};

/// Converts a frame to a target color mode.
///
/// Converting to the frame's current mode returns it unchanged. Spatial
/// dimensions never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConvert {
    target: ColorMode,
}

impl ColorConvert {
    /// Creates a conversion to `target`.
    pub fn new(target: ColorMode) -> Self {
        Self { target }
    }

    /// The mode frames are converted to.
    pub fn target(&self) -> ColorMode {
        self.target
    }
}

/// Swaps the first and third channel of every pixel.
fn swap_red_blue(mut image: RgbImage) -> RgbImage {
    for pixel in image.pixels_mut() {
        pixel.0.swap(0, 2);
    }
    image
}

impl Operation<ImageFrame, ImageFrame> for ColorConvert {
    fn apply(&self, frame: ImageFrame) -> VisionResult<ImageFrame> {
        let source = frame.mode();
        if source == self.target {
            return Ok(frame);
        }
        let (image, _) = frame.into_parts();
        let converted = match (source, self.target) {
            (ColorMode::Rgb, ColorMode::Bgr) | (ColorMode::Bgr, ColorMode::Rgb) => {
                ImageFrame::with_parts(
                    DynamicImage::ImageRgb8(swap_red_blue(image.into_rgb8())),
                    self.target,
                )
            }
            (ColorMode::Rgb, ColorMode::Grayscale) => ImageFrame::from_gray(image.into_luma8()),
            (ColorMode::Bgr, ColorMode::Grayscale) => {
                let rgb = DynamicImage::ImageRgb8(swap_red_blue(image.into_rgb8()));
                ImageFrame::from_gray(rgb.into_luma8())
            }
            (ColorMode::Grayscale, ColorMode::Rgb) | (ColorMode::Grayscale, ColorMode::Bgr) => {
                ImageFrame::with_parts(DynamicImage::ImageRgb8(image.into_rgb8()), self.target)
            }
            // equal modes returned early
            (same, _) => ImageFrame::with_parts(image, same),
        };
        Ok(converted)
    }

    fn transform_shape(&self, shape: TensorShape) -> VisionResult<TensorShape> {
        match shape.rank() {
            3 => Ok(shape.replace_dim(2, self.target.channels())),
            _ => Err(VisionError::shape_error(format!(
                "color conversion expects an [H, W, C] image shape, got {}",
                shape
            ))),
        }
    }

    fn name(&self) -> String {
        format!("ColorConvert({:?})", self.target)
    }
}
