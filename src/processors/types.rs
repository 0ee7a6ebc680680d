//! Types shared by the image processing operations.

use serde::{Deserialize, Serialize};

/// Specifies the order of channels in an image tensor.
///
/// `ToTensor` and `Normalize` must agree on this; `HWC` is the
/// channels-last layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChannelOrder {
    /// Channel, Height, Width order (common in PyTorch)
    #[default]
    CHW,
    /// Height, Width, Channel order (common in TensorFlow)
    HWC,
}

impl ChannelOrder {
    /// Returns true for the channels-last layout.
    pub fn is_channels_last(&self) -> bool {
        matches!(self, ChannelOrder::HWC)
    }

    /// Index of the channel axis in a tensor of the given rank.
    pub fn channel_axis(&self, rank: usize) -> Option<usize> {
        match self {
            ChannelOrder::CHW => (rank > 0).then_some(0),
            ChannelOrder::HWC => rank.checked_sub(1),
        }
    }
}
