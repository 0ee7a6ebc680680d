//! Image input types.
//!
//! An [`ImageFrame`] is the discrete pixel grid that flows through the image
//! stage of a preprocessor, before `ToTensor` turns it into floats. Samples are
//! always 8-bit. The [`ColorMode`] tag records how the channels are laid out,
//! since a BGR frame is stored in the same three-channel buffer as an RGB one.

use crate::core::errors::{VisionError, VisionResult};
use crate::core::shape::TensorShape;
use image::{DynamicImage, GrayImage, RgbImage};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Channel layout of an [`ImageFrame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColorMode {
    /// Red, green, blue
    Rgb,
    /// Blue, green, red
    Bgr,
    /// Single luminance channel
    Grayscale,
}

impl ColorMode {
    /// Number of channels for this mode.
    pub fn channels(&self) -> usize {
        match self {
            ColorMode::Rgb | ColorMode::Bgr => 3,
            ColorMode::Grayscale => 1,
        }
    }
}

/// An 8-bit pixel grid tagged with its channel layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFrame {
    image: DynamicImage,
    mode: ColorMode,
}

impl ImageFrame {
    /// Wraps an RGB image.
    pub fn from_rgb(image: RgbImage) -> Self {
        Self {
            image: DynamicImage::ImageRgb8(image),
            mode: ColorMode::Rgb,
        }
    }

    /// Wraps a grayscale image.
    pub fn from_gray(image: GrayImage) -> Self {
        Self {
            image: DynamicImage::ImageLuma8(image),
            mode: ColorMode::Grayscale,
        }
    }

    /// Converts any decoded image into a frame.
    ///
    /// Luminance images stay single-channel; everything else becomes 8-bit RGB
    /// with the alpha channel dropped.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        if image.color().has_color() {
            Self::from_rgb(image.into_rgb8())
        } else {
            Self::from_gray(image.into_luma8())
        }
    }

    /// Builds a frame from interleaved samples in the given layout.
    ///
    /// # Errors
    ///
    /// Returns a shape error if `data` does not hold exactly
    /// `width * height * mode.channels()` samples.
    pub fn from_raw(width: u32, height: u32, mode: ColorMode, data: Vec<u8>) -> VisionResult<Self> {
        let expected = width as usize * height as usize * mode.channels();
        if data.len() != expected {
            return Err(VisionError::shape_error(format!(
                "raw {:?} frame of {}x{} needs {} samples, got {}",
                mode,
                width,
                height,
                expected,
                data.len()
            )));
        }
        let image = match mode {
            ColorMode::Rgb | ColorMode::Bgr => {
                RgbImage::from_raw(width, height, data).map(DynamicImage::ImageRgb8)
            }
            ColorMode::Grayscale => {
                GrayImage::from_raw(width, height, data).map(DynamicImage::ImageLuma8)
            }
        };
        image
            .map(|image| Self { image, mode })
            .ok_or_else(|| VisionError::shape_error("raw frame buffer rejected"))
    }

    /// Re-tags a three-channel buffer without touching its samples.
    pub(crate) fn with_parts(image: DynamicImage, mode: ColorMode) -> Self {
        Self { image, mode }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        self.mode.channels()
    }

    /// Channel layout.
    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    /// Shape as `[height, width, channels]`.
    pub fn shape(&self) -> TensorShape {
        TensorShape::known(&[
            self.height() as usize,
            self.width() as usize,
            self.channels(),
        ])
    }

    /// Interleaved samples in row-major order.
    pub fn samples(&self) -> &[u8] {
        self.image.as_bytes()
    }

    /// The underlying image buffer.
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Consumes the frame, returning the buffer and its layout.
    pub fn into_parts(self) -> (DynamicImage, ColorMode) {
        (self.image, self.mode)
    }
}

impl From<RgbImage> for ImageFrame {
    fn from(image: RgbImage) -> Self {
        Self::from_rgb(image)
    }
}

impl From<GrayImage> for ImageFrame {
    fn from(image: GrayImage) -> Self {
        Self::from_gray(image)
    }
}

impl From<DynamicImage> for ImageFrame {
    fn from(image: DynamicImage) -> Self {
        Self::from_dynamic(image)
    }
}

/// An image handed to a predictor: either already in memory or a file to load.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// In-memory frame.
    Frame(ImageFrame),
    /// Path resolved through [`crate::utils::load_image`].
    Path(PathBuf),
}

impl ImageSource {
    /// Resolves the source into a frame, loading it from disk if needed.
    pub fn into_frame(self) -> VisionResult<ImageFrame> {
        match self {
            ImageSource::Frame(frame) => Ok(frame),
            ImageSource::Path(path) => crate::utils::load_image(&path),
        }
    }
}

impl From<ImageFrame> for ImageSource {
    fn from(frame: ImageFrame) -> Self {
        ImageSource::Frame(frame)
    }
}

impl From<DynamicImage> for ImageSource {
    fn from(image: DynamicImage) -> Self {
        ImageSource::Frame(ImageFrame::from_dynamic(image))
    }
}

impl From<RgbImage> for ImageSource {
    fn from(image: RgbImage) -> Self {
        ImageSource::Frame(ImageFrame::from_rgb(image))
    }
}

impl From<GrayImage> for ImageSource {
    fn from(image: GrayImage) -> Self {
        ImageSource::Frame(ImageFrame::from_gray(image))
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        ImageSource::Path(path.to_path_buf())
    }
}

impl From<&str> for ImageSource {
    fn from(path: &str) -> Self {
        ImageSource::Path(PathBuf::from(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{LumaA, Rgba, RgbaImage};

    #[test]
    fn test_shape_is_hwc() {
        let frame = ImageFrame::from_rgb(RgbImage::new(4, 2));
        assert_eq!(frame.shape(), TensorShape::known(&[2, 4, 3]));
        assert_eq!(frame.samples().len(), 24);
    }

    #[test]
    fn test_from_dynamic_drops_alpha() {
        let rgba = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 40]));
        let frame = ImageFrame::from_dynamic(DynamicImage::ImageRgba8(rgba));
        assert_eq!(frame.mode(), ColorMode::Rgb);
        assert_eq!(&frame.samples()[..3], &[10, 20, 30]);

        let la = image::ImageBuffer::from_pixel(1, 1, LumaA([7u8, 255]));
        let frame = ImageFrame::from_dynamic(DynamicImage::ImageLumaA8(la));
        assert_eq!(frame.mode(), ColorMode::Grayscale);
        assert_eq!(frame.samples(), &[7]);
    }

    #[test]
    fn test_from_raw_checks_length() {
        assert!(ImageFrame::from_raw(2, 2, ColorMode::Bgr, vec![0; 12]).is_ok());
        let err = ImageFrame::from_raw(2, 2, ColorMode::Grayscale, vec![0; 3]).unwrap_err();
        assert!(err.is_shape());
    }
}
