//! Constants used throughout the vision pipeline.
//!
//! Decoder thresholds and caps defined here are defaults that match the
//! architectures shipped in [`crate::models`]. Every decoder accepts its own
//! override.

/// The default coefficient for `Rescale`.
///
/// Dividing 8-bit samples by this value maps them onto `[0, 1]`.
pub const DEFAULT_RESCALE_COEFFICIENT: f32 = 255.0;

/// The default confidence threshold for SSD-style detection.
pub const DEFAULT_SSD_THRESHOLD: f32 = 0.5;

/// The default cap on decoded SSD detections.
///
/// SSD-MobileNet style exports truncate their output tensors to this many
/// candidates.
pub const DEFAULT_SSD_MAX_DETECTIONS: usize = 25;

/// The default person-probability threshold for multi-pose decoding.
pub const DEFAULT_MULTIPOSE_THRESHOLD: f32 = 0.05;

/// The default maximum number of people in a multi-pose output.
pub const DEFAULT_MULTIPOSE_MAX_DETECTIONS: usize = 6;

/// The number of body keypoints in a pose skeleton.
pub const NUM_KEYPOINTS: usize = 17;

/// Floats per keypoint in a pose output: y, x, confidence.
pub const KEYPOINT_STRIDE: usize = 3;

/// Floats per detection in a multi-pose output.
///
/// 17 keypoint triples, four box edges and one person probability.
pub const MULTIPOSE_DETECTION_LEN: usize = NUM_KEYPOINTS * KEYPOINT_STRIDE + 4 + 1;

/// The default number of facial landmarks.
pub const DEFAULT_LANDMARK_POINTS: usize = 106;

/// The default value for top-k selection.
pub const DEFAULT_TOPK: usize = 5;

/// The default threshold for parallel processing.
///
/// Batches smaller than this are preprocessed sequentially.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4;
