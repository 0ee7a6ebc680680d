//! SSD-MobileNet-v1 detection presets.
//!
//! Both variants emit COCO ids. The ONNX export reports them 1-based, matching
//! the sparse 91-id table directly; the TFLite export reports them 0-based and
//! needs a +1 class offset.

use crate::core::config::{ModelConfig, TransformConfig};
use crate::domain::labels::LabelMap;
use crate::processors::decode::{SsdDecoder, SsdModelMetadata, TaskDecoder};
use crate::processors::types::ChannelOrder;

/// Square input side used by both exports.
pub const SSD_INPUT_SIZE: u32 = 300;

/// Output tensor names of the ONNX export.
pub fn onnx_metadata() -> SsdModelMetadata {
    SsdModelMetadata::new(
        "detection_boxes:0",
        "detection_classes:0",
        "detection_scores:0",
    )
    .with_num_detections("num_detections:0")
}

/// Output tensor names of the TFLite export.
pub fn tflite_metadata() -> SsdModelMetadata {
    SsdModelMetadata::new(
        "TFLite_Detection_PostProcess",
        "TFLite_Detection_PostProcess:1",
        "TFLite_Detection_PostProcess:2",
    )
    .with_num_detections("TFLite_Detection_PostProcess:3")
    .with_class_offset(1)
}

/// SSD-MobileNet-v1 from the ONNX model zoo: raw `[0, 255]` NHWC input.
pub fn ssd_mobilenet_v1() -> ModelConfig {
    ModelConfig::new(
        "ssd_mobilenet_v1",
        vec![
            TransformConfig::resize(SSD_INPUT_SIZE, SSD_INPUT_SIZE),
            TransformConfig::to_tensor(ChannelOrder::HWC),
        ],
        TaskDecoder::ObjectDetection(SsdDecoder::new(onnx_metadata(), LabelMap::coco91())),
    )
}

/// The float TFLite export: NHWC input scaled to `[-1, 1]`.
pub fn ssd_mobilenet_v1_tflite() -> ModelConfig {
    ModelConfig::new(
        "ssd_mobilenet_v1_tflite",
        vec![
            TransformConfig::resize(SSD_INPUT_SIZE, SSD_INPUT_SIZE),
            TransformConfig::to_tensor(ChannelOrder::HWC),
            TransformConfig::normalize(vec![127.5; 3], vec![127.5; 3], ChannelOrder::HWC),
        ],
        TaskDecoder::ObjectDetection(SsdDecoder::new(tflite_metadata(), LabelMap::coco91())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(ssd_mobilenet_v1().validate().is_ok());
        assert!(ssd_mobilenet_v1_tflite().validate().is_ok());
    }

    #[test]
    fn test_tflite_offset_reaches_person() {
        let meta = tflite_metadata();
        // TFLite class 0 is "person", id 1 in the sparse table.
        assert_eq!(LabelMap::coco91().get_signed(meta.class_offset), Some("person"));
        assert_eq!(onnx_metadata().class_offset, 0);
    }
}
