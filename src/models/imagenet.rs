//! ImageNet-style classification preprocessing.
//!
//! Classification backbones are trained with one of three input conventions,
//! named after the framework that popularised them. Feeding a network the wrong
//! one does not fail; it silently degrades accuracy, so the convention is part
//! of the model description.

use crate::core::config::{ModelConfig, TransformConfig};
use crate::domain::image::ColorMode;
use crate::domain::labels::LabelMap;
use crate::processors::decode::{ClassificationDecoder, TaskDecoder};
use crate::processors::types::ChannelOrder;
use serde::{Deserialize, Serialize};

/// Default square input side of ImageNet classifiers.
pub const IMAGENET_INPUT_SIZE: u32 = 224;

/// Per-channel ImageNet mean in `[0, 1]` RGB.
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
/// Per-channel ImageNet standard deviation in `[0, 1]` RGB.
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];
/// Per-channel ImageNet mean in `[0, 255]` BGR.
pub const CAFFE_BGR_MEAN: [f32; 3] = [103.939, 116.779, 123.68];

/// Input convention of a classification network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    /// RGB scaled to `[-1, 1]`.
    Tf,
    /// BGR in `[0, 255]` with the ImageNet mean subtracted.
    Caffe,
    /// RGB scaled to `[0, 1]`, then ImageNet mean/std.
    Torch,
}

impl InputType {
    /// Channel layout these networks are usually exported with.
    pub fn default_order(&self) -> ChannelOrder {
        match self {
            InputType::Tf | InputType::Caffe => ChannelOrder::HWC,
            InputType::Torch => ChannelOrder::CHW,
        }
    }

    /// Preprocessing stages for a `width` x `height` input in `order`.
    pub fn preprocessing(
        &self,
        width: u32,
        height: u32,
        order: ChannelOrder,
    ) -> Vec<TransformConfig> {
        let mut stages = vec![TransformConfig::resize(width, height)];
        match self {
            InputType::Tf => {
                stages.push(TransformConfig::to_tensor(order));
                stages.push(TransformConfig::normalize(
                    vec![127.5; 3],
                    vec![127.5; 3],
                    order,
                ));
            }
            InputType::Caffe => {
                stages.push(TransformConfig::color(ColorMode::Bgr));
                stages.push(TransformConfig::to_tensor(order));
                stages.push(TransformConfig::normalize(
                    CAFFE_BGR_MEAN.to_vec(),
                    vec![1.0; 3],
                    order,
                ));
            }
            InputType::Torch => {
                stages.push(TransformConfig::to_tensor(order));
                stages.push(TransformConfig::rescale(255.0));
                stages.push(TransformConfig::normalize(
                    IMAGENET_MEAN.to_vec(),
                    IMAGENET_STD.to_vec(),
                    order,
                ));
            }
        }
        stages
    }
}

/// A 224 x 224 classifier with the convention's usual channel layout.
pub fn classifier(
    model_name: impl Into<String>,
    input_type: InputType,
    labels: LabelMap,
) -> ModelConfig {
    ModelConfig::new(
        model_name,
        input_type.preprocessing(
            IMAGENET_INPUT_SIZE,
            IMAGENET_INPUT_SIZE,
            input_type.default_order(),
        ),
        TaskDecoder::Classification(ClassificationDecoder::new(labels)),
    )
}
