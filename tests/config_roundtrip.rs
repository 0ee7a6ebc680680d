//! JSON model configuration: presets survive a save/load cycle, and handwritten
//! files parse into working decoders.

mod common;

use common::{MockEngine, array};
use image::RgbImage;
use oar_vision::core::{
    ModelConfig, OrtGraphOptimizationLevel, OrtSessionConfig, OutputTensors, TaskType,
};
use oar_vision::domain::LabelMap;
use oar_vision::models::{self, InputType};
use oar_vision::predictors::VisionModel;
use oar_vision::processors::{Prediction, TaskDecoder};

#[test]
fn presets_round_trip_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let configs = models::SUPPORTED_MODELS
        .iter()
        .map(|name| models::preset(name).unwrap())
        .chain(std::iter::once(models::classifier(
            "resnet50",
            InputType::Caffe,
            LabelMap::from_names(["cat", "dog"]),
        )));

    for config in configs {
        let path = dir.path().join(format!("{}.json", config.model_name));
        config.to_json_file(&path).unwrap();
        let loaded = ModelConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(loaded.validate().is_ok());
    }
}

#[test]
fn session_options_are_kept() {
    let config = models::face_alignment_2d106().with_session(
        OrtSessionConfig::new()
            .with_intra_threads(2)
            .with_optimization_level(OrtGraphOptimizationLevel::Level3),
    );
    let json = config.to_json_string().unwrap();
    assert!(json.contains("\"intra_threads\": 2"));
    assert_eq!(ModelConfig::from_json_str(&json).unwrap(), config);
}

#[test]
fn handwritten_detector_config() {
    let config = ModelConfig::from_json_str(
        r#"{
            "model_name": "toy_ssd",
            "preprocessing": [
                {"type": "resize", "width": 16, "height": 16, "interpolation": "nearest"},
                {"type": "to_tensor", "order": "HWC"}
            ],
            "decoder": {
                "task": "object_detection",
                "metadata": {
                    "boxes_output": "boxes",
                    "classes_output": "classes",
                    "scores_output": "scores",
                    "class_offset": 1
                },
                "labels": [[1, "apple"], [2, "pear"]],
                "threshold": 0.3,
                "max_detections": 2
            }
        }"#,
    )
    .unwrap();
    assert_eq!(config.task_type(), TaskType::ObjectDetection);
    match &config.decoder {
        TaskDecoder::ObjectDetection(decoder) => {
            assert_eq!(decoder.labels.get(2), Some("pear"));
            assert_eq!(decoder.max_detections, 2);
        }
        other => panic!("unexpected decoder {other:?}"),
    }

    let outputs = OutputTensors::new()
        .with(
            "boxes",
            array(&[3, 4], vec![0.0, 0.0, 0.5, 0.5, 0.5, 0.5, 1.0, 1.0, 0.2, 0.2, 0.3, 0.3]),
        )
        .with("classes", array(&[3], vec![1.0, 0.0, 0.0]))
        .with("scores", array(&[3], vec![0.4, 0.2, 0.9]));
    let (engine, _) = MockEngine::new(outputs);
    let mut model = VisionModel::new(config, engine).unwrap();

    // The third candidate is past the cap of two.
    match model.predict(RgbImage::new(20, 20)).unwrap() {
        Prediction::Objects(objects) => {
            assert_eq!(objects.len(), 1);
            assert_eq!(objects[0].label, "pear");
        }
        other => panic!("unexpected prediction {other:?}"),
    }
}

#[test]
fn invalid_configs_are_configuration_errors() {
    let two_tensors = r#"{
        "model_name": "broken",
        "preprocessing": [
            {"type": "to_tensor", "order": "CHW"},
            {"type": "to_tensor", "order": "CHW"}
        ],
        "decoder": {"task": "pose_estimation"}
    }"#;
    let config = ModelConfig::from_json_str(two_tensors).unwrap();
    let (engine, _) = MockEngine::new(OutputTensors::new());
    assert!(VisionModel::new(config, engine).unwrap_err().is_configuration());

    let mismatched_order = r#"{
        "model_name": "broken",
        "preprocessing": [
            {"type": "to_tensor", "order": "HWC"},
            {"type": "normalize", "mean": [0.5, 0.5, 0.5], "std": [0.5, 0.5, 0.5], "order": "CHW"}
        ],
        "decoder": {"task": "pose_estimation"}
    }"#;
    let config = ModelConfig::from_json_str(mismatched_order).unwrap();
    assert!(config.validate().unwrap_err().is_configuration());

    let gray_with_rgb_stats = r#"{
        "model_name": "broken",
        "preprocessing": [
            {"type": "color_convert", "mode": "GRAYSCALE"},
            {"type": "to_tensor", "order": "CHW"},
            {"type": "normalize", "mean": [0.5, 0.5, 0.5], "std": [0.5, 0.5, 0.5], "order": "CHW"}
        ],
        "decoder": {"task": "pose_estimation"}
    }"#;
    let config = ModelConfig::from_json_str(gray_with_rgb_stats).unwrap();
    assert!(config.validate().unwrap_err().is_configuration());

    let bad_threshold = r#"{
        "model_name": "broken",
        "preprocessing": [{"type": "to_tensor"}],
        "decoder": {
            "task": "object_detection",
            "metadata": {"boxes_output": "b", "classes_output": "c", "scores_output": "s"},
            "labels": [],
            "threshold": 1.5
        }
    }"#;
    let config = ModelConfig::from_json_str(bad_threshold).unwrap();
    assert!(config.validate().unwrap_err().is_configuration());
}

#[test]
fn unknown_fields_in_tagged_enums_fail_to_parse() {
    let err = ModelConfig::from_json_str(
        r#"{
            "model_name": "x",
            "preprocessing": [{"type": "blur", "radius": 2}],
            "decoder": {"task": "pose_estimation"}
        }"#,
    )
    .unwrap_err();
    assert!(matches!(err, oar_vision::core::VisionError::Json(_)));
}
