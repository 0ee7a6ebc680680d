//! Error types for the vision inference pipeline.
//!
//! Three error kinds describe a structural mismatch between configuration and
//! model: configuration errors, shape errors and decode errors. None of them is
//! retried; they surface to the caller as soon as they occur. Failures raised by
//! the execution engine are carried through unchanged in their own variants so
//! callers can tell a misconfigured pipeline apart from a rejected tensor.

use thiserror::Error;

/// Enum representing the errors that can occur in the vision pipeline.
#[derive(Error, Debug)]
pub enum VisionError {
    /// Malformed transform or decoder parameters.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration problem.
        message: String,
    },

    /// Shape propagation hit an unknown dimension where a concrete count was
    /// required, or a tensor's data does not match its declared shape.
    #[error("shape: {message}")]
    ShapeError {
        /// A message describing the shape problem.
        message: String,
    },

    /// An output tensor is missing, has an unexpected rank, or a class index has
    /// no label mapping.
    #[error("decode: {message}")]
    DecodeError {
        /// A message describing the decode problem.
        message: String,
    },

    /// Error from the ONNX Runtime session, passed through untouched.
    #[error(transparent)]
    Session(#[from] ort::Error),

    /// Error from any other execution engine, passed through untouched.
    #[error(transparent)]
    Engine(Box<dyn std::error::Error + Send + Sync>),

    /// Error occurred while loading an image.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// Error from ndarray reshaping.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// Error while reading or writing a configuration file.
    #[error("json")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

/// Convenient result alias for vision operations.
pub type VisionResult<T> = Result<T, VisionError>;

impl VisionError {
    /// Creates a configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Creates a configuration error naming the offending field and value.
    pub fn config_error_with_context(field: &str, value: &str, reason: &str) -> Self {
        Self::ConfigError {
            message: format!(
                "Configuration error in field '{}' with value '{}': {}",
                field, value, reason
            ),
        }
    }

    /// Creates a shape error.
    pub fn shape_error(message: impl Into<String>) -> Self {
        Self::ShapeError {
            message: message.into(),
        }
    }

    /// Creates a decode error.
    pub fn decode_error(message: impl Into<String>) -> Self {
        Self::DecodeError {
            message: message.into(),
        }
    }

    /// Creates a decode error for an output tensor the engine did not return.
    pub fn missing_output(name: &str, available: &[&str]) -> Self {
        Self::DecodeError {
            message: format!(
                "output tensor '{}' not found (available: [{}])",
                name,
                available.join(", ")
            ),
        }
    }

    /// Creates a decode error for an output tensor of the wrong rank.
    pub fn unexpected_rank(name: &str, expected: &str, actual: &[usize]) -> Self {
        Self::DecodeError {
            message: format!(
                "output tensor '{}' has shape {:?}, expected rank {}",
                name, actual, expected
            ),
        }
    }

    /// Creates a decode error for a class index without a label.
    pub fn unknown_class(index: i64) -> Self {
        Self::DecodeError {
            message: format!("class index {} has no label mapping", index),
        }
    }

    /// Wraps a failure reported by a non-ONNX execution engine.
    pub fn engine_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Engine(Box::new(error))
    }

    /// Returns true for configuration errors.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }

    /// Returns true for shape errors.
    pub fn is_shape(&self) -> bool {
        matches!(self, Self::ShapeError { .. })
    }

    /// Returns true for decode errors.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::DecodeError { .. })
    }

    /// Returns true when the failure came from the execution engine.
    pub fn is_engine(&self) -> bool {
        matches!(self, Self::Session(_) | Self::Engine(_))
    }
}

impl From<image::ImageError> for VisionError {
    fn from(error: image::ImageError) -> Self {
        Self::ImageLoad(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_predicates() {
        assert!(VisionError::config_error("bad mean").is_configuration());
        assert!(VisionError::shape_error("unknown dim").is_shape());
        assert!(VisionError::unknown_class(7).is_decode());
        assert!(!VisionError::unknown_class(7).is_engine());
    }

    #[test]
    fn test_engine_error_is_transparent() {
        let io = std::io::Error::other("engine rejected tensor");
        let err = VisionError::engine_error(io);
        assert!(err.is_engine());
        assert_eq!(err.to_string(), "engine rejected tensor");
    }

    #[test]
    fn test_missing_output_message_lists_available_names() {
        let err = VisionError::missing_output("scores", &["boxes", "classes"]);
        assert_eq!(
            err.to_string(),
            "decode: output tensor 'scores' not found (available: [boxes, classes])"
        );
    }
}
