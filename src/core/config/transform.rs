//! Transform configuration types.
//!
//! A preprocessing pipeline is described as an ordered list of
//! [`TransformConfig`] values, one immutable struct per stage. The list is
//! consumed by [`Preprocessor::from_configs`](crate::processors::Preprocessor::from_configs),
//! which validates the order and composes the stages.

use crate::core::constants::DEFAULT_RESCALE_COEFFICIENT;
use crate::domain::image::ColorMode;
use crate::processors::types::ChannelOrder;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

/// Interpolation policy used by `Resize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Nearest neighbour.
    Nearest,
    /// Bilinear (triangle filter).
    #[default]
    Bilinear,
    /// Bicubic (Catmull-Rom).
    Bicubic,
    /// Lanczos with a window of 3.
    Lanczos3,
}

impl Interpolation {
    /// Maps the policy onto the `image` crate's filter.
    pub fn filter_type(&self) -> FilterType {
        match self {
            Interpolation::Nearest => FilterType::Nearest,
            Interpolation::Bilinear => FilterType::Triangle,
            Interpolation::Bicubic => FilterType::CatmullRom,
            Interpolation::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

fn default_rescale() -> f32 {
    DEFAULT_RESCALE_COEFFICIENT
}

/// Configuration for one preprocessing stage.
///
/// Serialized with an internal `"type"` tag, for example
/// `{"type": "resize", "width": 192, "height": 192}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransformConfig {
    /// Resize to exact output dimensions.
    Resize {
        /// Output width in pixels.
        width: u32,
        /// Output height in pixels.
        height: u32,
        /// Interpolation policy (default: bilinear).
        #[serde(default)]
        interpolation: Interpolation,
    },
    /// Convert between RGB, BGR and grayscale.
    ColorConvert {
        /// Target channel layout.
        mode: ColorMode,
    },
    /// Flatten the pixel grid into a float tensor.
    ToTensor {
        /// Channel order of the produced tensor (default: CHW).
        #[serde(default)]
        order: ChannelOrder,
    },
    /// Multiply every element by `1 / coefficient`.
    Rescale {
        /// Divisor (default: 255).
        #[serde(default = "default_rescale")]
        coefficient: f32,
    },
    /// Per-channel `(x - mean[c]) / std[c]`.
    Normalize {
        /// The mean values for each channel.
        mean: Vec<f32>,
        /// The standard deviation values for each channel.
        std: Vec<f32>,
        /// Channel order of the incoming tensor (default: CHW).
        #[serde(default)]
        order: ChannelOrder,
    },
}

impl TransformConfig {
    /// Bilinear resize to `width` x `height`.
    pub fn resize(width: u32, height: u32) -> Self {
        TransformConfig::Resize {
            width,
            height,
            interpolation: Interpolation::default(),
        }
    }

    /// Color conversion to `mode`.
    pub fn color(mode: ColorMode) -> Self {
        TransformConfig::ColorConvert { mode }
    }

    /// `ToTensor` with the given channel order.
    pub fn to_tensor(order: ChannelOrder) -> Self {
        TransformConfig::ToTensor { order }
    }

    /// `Rescale` by `coefficient`.
    pub fn rescale(coefficient: f32) -> Self {
        TransformConfig::Rescale { coefficient }
    }

    /// `Normalize` with per-channel mean and standard deviation.
    pub fn normalize(mean: Vec<f32>, std: Vec<f32>, order: ChannelOrder) -> Self {
        TransformConfig::Normalize { mean, std, order }
    }

    /// Returns true for stages that run on the pixel grid, before `ToTensor`.
    pub fn is_image_stage(&self) -> bool {
        matches!(
            self,
            TransformConfig::Resize { .. } | TransformConfig::ColorConvert { .. }
        )
    }

    /// Returns true for stages that run on floats, after `ToTensor`.
    pub fn is_tensor_stage(&self) -> bool {
        matches!(
            self,
            TransformConfig::Rescale { .. } | TransformConfig::Normalize { .. }
        )
    }

    /// Stage name used in error messages and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            TransformConfig::Resize { .. } => "resize",
            TransformConfig::ColorConvert { .. } => "color_convert",
            TransformConfig::ToTensor { .. } => "to_tensor",
            TransformConfig::Rescale { .. } => "rescale",
            TransformConfig::Normalize { .. } => "normalize",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_json_with_defaults() {
        let json = r#"[
            {"type": "resize", "width": 256, "height": 128},
            {"type": "color_convert", "mode": "BGR"},
            {"type": "to_tensor", "order": "HWC"},
            {"type": "rescale"},
            {"type": "normalize", "mean": [0.5], "std": [0.5]}
        ]"#;
        let configs: Vec<TransformConfig> = serde_json::from_str(json).unwrap();
        assert_eq!(configs[0], TransformConfig::resize(256, 128));
        assert_eq!(configs[1], TransformConfig::color(ColorMode::Bgr));
        assert_eq!(configs[2], TransformConfig::to_tensor(ChannelOrder::HWC));
        assert_eq!(configs[3], TransformConfig::rescale(255.0));
        assert_eq!(
            configs[4],
            TransformConfig::normalize(vec![0.5], vec![0.5], ChannelOrder::CHW)
        );
    }

    #[test]
    fn test_unknown_transform_is_rejected() {
        let err = serde_json::from_str::<TransformConfig>(r#"{"type": "blur", "sigma": 1.0}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_stage_kinds() {
        assert!(TransformConfig::resize(1, 1).is_image_stage());
        assert!(TransformConfig::rescale(2.0).is_tensor_stage());
        let to_tensor = TransformConfig::to_tensor(ChannelOrder::CHW);
        assert!(!to_tensor.is_image_stage() && !to_tensor.is_tensor_stage());
        assert_eq!(to_tensor.kind(), "to_tensor");
    }
}
