//! Building a complete preprocessing operation from configuration.
//!
//! A [`Preprocessor`] is always shaped the same way:
//!
//! ```text
//! [image stages] -> ToTensor -> [tensor stages]
//! ```
//!
//! The image stages work on 8-bit pixel grids, the tensor stages on `f32`
//! values. [`Preprocessor::from_configs`] enforces that split so a configuration
//! can never ask to resize floats or normalize bytes.

use crate::core::config::transform::TransformConfig;
use crate::core::errors::{VisionError, VisionResult};
use crate::core::operation::{Chain, Operation};
use crate::core::pipeline::Pipeline;
use crate::core::shape::TensorShape;
use crate::core::tensor::FloatTensor;
use crate::domain::image::{ColorMode, ImageFrame};
use crate::processors::color::ColorConvert;
use crate::processors::normalization::Normalize;
use crate::processors::rescale::Rescale;
use crate::processors::resize::Resize;
use crate::processors::to_tensor::ToTensor;
use crate::processors::types::ChannelOrder;

type ImageToTensor = Chain<Pipeline<ImageFrame>, ToTensor, ImageFrame>;
type FullChain = Chain<ImageToTensor, Pipeline<FloatTensor>, FloatTensor>;

/// The composed `ImageFrame -> FloatTensor` preprocessing operation.
#[derive(Debug)]
pub struct Preprocessor {
    chain: FullChain,
    color_mode: Option<ColorMode>,
    input_size: Option<(u32, u32)>,
}

impl Preprocessor {
    /// Composes already-built stages.
    pub fn new(
        image_stages: Pipeline<ImageFrame>,
        to_tensor: ToTensor,
        tensor_stages: Pipeline<FloatTensor>,
    ) -> Self {
        Self {
            chain: Chain::new(Chain::new(image_stages, to_tensor), tensor_stages),
            color_mode: None,
            input_size: None,
        }
    }

    /// Validates a list of transform configurations and composes it.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if:
    /// * `ToTensor` does not appear exactly once
    /// * an image stage (resize, color conversion) follows `ToTensor`
    /// * a tensor stage (rescale, normalize) precedes `ToTensor`
    /// * a `Normalize` declares a channel order different from `ToTensor`
    /// * a `Normalize` channel count contradicts an earlier color conversion
    /// * any stage has invalid parameters
    pub fn from_configs(configs: &[TransformConfig]) -> VisionResult<Self> {
        let to_tensor_positions: Vec<usize> = configs
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, TransformConfig::ToTensor { .. }))
            .map(|(i, _)| i)
            .collect();
        let split = match to_tensor_positions.as_slice() {
            [single] => *single,
            [] => {
                return Err(VisionError::config_error(
                    "preprocessing needs a to_tensor stage",
                ));
            }
            many => {
                return Err(VisionError::config_error(format!(
                    "preprocessing has {} to_tensor stages, expected exactly one",
                    many.len()
                )));
            }
        };
        let order = match &configs[split] {
            TransformConfig::ToTensor { order } => *order,
            _ => ChannelOrder::default(),
        };

        let mut image_stages = Pipeline::new();
        let mut color_mode = None;
        let mut input_size = None;
        for (i, config) in configs[..split].iter().enumerate() {
            image_stages = match config {
                TransformConfig::Resize {
                    width,
                    height,
                    interpolation,
                } => {
                    input_size = Some((*width, *height));
                    image_stages.stage(Resize::new(*width, *height, *interpolation)?)
                }
                TransformConfig::ColorConvert { mode } => {
                    color_mode = Some(*mode);
                    image_stages.stage(ColorConvert::new(*mode))
                }
                other => {
                    return Err(VisionError::config_error(format!(
                        "stage {} ({}) works on float tensors and must come after to_tensor",
                        i,
                        other.kind()
                    )));
                }
            };
        }

        let mut tensor_stages = Pipeline::new();
        for (i, config) in configs.iter().enumerate().skip(split + 1) {
            tensor_stages = match config {
                TransformConfig::Rescale { coefficient } => {
                    tensor_stages.stage(Rescale::new(*coefficient)?)
                }
                TransformConfig::Normalize {
                    mean,
                    std,
                    order: norm_order,
                } => {
                    if *norm_order != order {
                        return Err(VisionError::config_error(format!(
                            "stage {} (normalize) expects {:?} but to_tensor produces {:?}",
                            i, norm_order, order
                        )));
                    }
                    if let Some(mode) = color_mode
                        && mean.len() != mode.channels()
                    {
                        return Err(VisionError::config_error(format!(
                            "stage {} (normalize) has {} mean/std values but the image is {:?} with {} channel(s)",
                            i,
                            mean.len(),
                            mode,
                            mode.channels()
                        )));
                    }
                    tensor_stages.stage(Normalize::new(mean.clone(), std.clone(), order)?)
                }
                other => {
                    return Err(VisionError::config_error(format!(
                        "stage {} ({}) works on pixel grids and must come before to_tensor",
                        i,
                        other.kind()
                    )));
                }
            };
        }

        tracing::debug!(
            "Built preprocessor: {} image stage(s), to_tensor {:?}, {} tensor stage(s)",
            image_stages.len(),
            order,
            tensor_stages.len()
        );

        let mut preprocessor = Self::new(image_stages, ToTensor::new(order), tensor_stages);
        preprocessor.color_mode = color_mode;
        preprocessor.input_size = input_size;
        Ok(preprocessor)
    }

    /// Propagates an `[H, W, C]` image shape through every stage.
    ///
    /// Runs the static shape contracts only; no pixel data is touched.
    pub fn output_shape(&self, input_shape: &TensorShape) -> VisionResult<TensorShape> {
        self.chain.transform_shape(input_shape.clone())
    }

    /// Channel order of the produced tensor.
    pub fn channel_order(&self) -> ChannelOrder {
        self.chain.first().second().order()
    }

    /// Color mode of the produced tensor, if the pipeline converts it.
    pub fn color_mode(&self) -> Option<ColorMode> {
        self.color_mode
    }

    /// Last resize target as `(width, height)`, if any.
    pub fn input_size(&self) -> Option<(u32, u32)> {
        self.input_size
    }
}

impl Operation<ImageFrame, FloatTensor> for Preprocessor {
    fn apply(&self, frame: ImageFrame) -> VisionResult<FloatTensor> {
        self.chain.apply(frame)
    }

    fn transform_shape(&self, shape: TensorShape) -> VisionResult<TensorShape> {
        self.chain.transform_shape(shape)
    }

    fn name(&self) -> String {
        self.chain.name()
    }
}
