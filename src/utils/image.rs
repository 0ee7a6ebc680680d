//! Loading images from disk.
//!
//! This stands in for the external image loader: it decodes any format
//! supported by the `image` crate into an [`ImageFrame`].

use crate::core::constants::DEFAULT_PARALLEL_THRESHOLD;
use crate::core::errors::VisionResult;
use crate::domain::image::ImageFrame;
use std::path::Path;

/// Loads an image from a file path.
///
/// Color images become 8-bit RGB frames (alpha is dropped); luminance images
/// become grayscale frames.
///
/// # Errors
///
/// Returns `VisionError::ImageLoad` if the file cannot be opened or decoded.
pub fn load_image(path: &Path) -> VisionResult<ImageFrame> {
    let img = image::open(path)?;
    tracing::debug!(
        "Loaded {} ({}x{}, {:?})",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );
    Ok(ImageFrame::from_dynamic(img))
}

/// Loads a batch of images, in parallel above `parallel_threshold` paths.
///
/// Results are returned per path so one unreadable file does not hide the others.
pub fn load_images<P: AsRef<Path> + Sync>(
    paths: &[P],
    parallel_threshold: Option<usize>,
) -> Vec<VisionResult<ImageFrame>> {
    let threshold = parallel_threshold.unwrap_or(DEFAULT_PARALLEL_THRESHOLD);

    if paths.len() > threshold {
        use rayon::prelude::*;
        paths.par_iter().map(|p| load_image(p.as_ref())).collect()
    } else {
        paths.iter().map(|p| load_image(p.as_ref())).collect()
    }
}
