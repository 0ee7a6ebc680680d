//! Preprocessing operations and post-processing decoders.
//!
//! The image side of a model lives here as [`Operation`](crate::core::Operation)
//! implementations ([`Resize`], [`ColorConvert`], [`ToTensor`], [`Rescale`],
//! [`Normalize`]) composed into a [`Preprocessor`]. The output side lives in
//! [`decode`].

pub mod color;
pub mod decode;
pub mod normalization;
pub mod preprocess;
pub mod rescale;
pub mod resize;
pub mod to_tensor;
pub mod topk;
pub mod types;

pub use color::ColorConvert;
pub use decode::{
    ClassificationDecoder, Decoder, DetectionOptions, LandmarkDecoder, MultiPoseDecoder,
    Prediction, SinglePoseDecoder, SsdDecoder, SsdModelMetadata, TaskDecoder,
};
pub use normalization::Normalize;
pub use preprocess::Preprocessor;
pub use rescale::Rescale;
pub use resize::Resize;
pub use to_tensor::ToTensor;
pub use topk::{TopkResult, argmax, topk};
pub use types::ChannelOrder;
