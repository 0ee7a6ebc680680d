//! Composition laws of operations and preprocessing pipelines.

mod common;

use common::assert_close;
use image::{Rgb, RgbImage};
use oar_vision::core::{
    FloatTensor, Identity, Operation, OperationExt, Pipeline, TensorShape, TransformConfig,
    compose, from_fn,
};
use oar_vision::domain::{ColorMode, ImageFrame};
use oar_vision::processors::{
    ChannelOrder, ColorConvert, Normalize, Preprocessor, Rescale, Resize, ToTensor,
};

fn gradient(width: u32, height: u32) -> ImageFrame {
    ImageFrame::from_rgb(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x + y) % 256) as u8])
    }))
}

#[test]
fn image_chains_are_associative() {
    let a = || Resize::bilinear(12, 9).unwrap();
    let b = || ColorConvert::new(ColorMode::Bgr);
    let c = || ToTensor::new(ChannelOrder::CHW);

    let left = a().then(b()).then(c());
    let right = a().then(b().then(c()));
    let input = gradient(31, 17);
    assert_eq!(
        left.apply(input.clone()).unwrap(),
        right.apply(input).unwrap()
    );
}

#[test]
fn tensor_chains_are_associative_and_repeatable() {
    let make = || {
        (
            Rescale::new(255.0).unwrap(),
            Normalize::new(vec![0.5; 3], vec![0.25; 3], ChannelOrder::HWC).unwrap(),
            from_fn("double", |t: FloatTensor| Ok(t.map(|v| v * 2.0))),
        )
    };
    let (a1, b1, c1) = make();
    let (a2, b2, c2) = make();
    let left = compose(compose(a1, b1), c1);
    let right = compose(a2, compose(b2, c2));

    let input = ToTensor::new(ChannelOrder::HWC).apply(gradient(5, 4)).unwrap();
    let first = left.apply(input.clone()).unwrap();
    assert_eq!(first, right.apply(input.clone()).unwrap());
    assert_eq!(first, left.apply(input).unwrap());
}

#[test]
fn empty_pipeline_is_identity() {
    let frame = gradient(6, 3);
    assert_eq!(Pipeline::<ImageFrame>::new().apply(frame.clone()).unwrap(), frame);
    assert_eq!(Identity.apply(frame.clone()).unwrap(), frame);

    let shape = TensorShape::with_unknown_batch(&[3, 8, 8]);
    assert_eq!(
        Pipeline::<FloatTensor>::new()
            .transform_shape(shape.clone())
            .unwrap(),
        shape
    );
}

#[test]
fn rescale_round_trip_recovers_samples() {
    let frame = gradient(16, 16);
    let samples: Vec<f32> = frame.samples().iter().map(|&s| s as f32).collect();
    let scaled = ToTensor::new(ChannelOrder::HWC)
        .then(Rescale::default())
        .apply(frame)
        .unwrap();
    for (restored, original) in scaled.data().iter().zip(samples) {
        assert!(((restored * 255.0).round() - original).abs() <= 1.0);
    }
}

#[test]
fn static_shape_matches_applied_shape() {
    let preprocessor = Preprocessor::from_configs(&[
        TransformConfig::resize(40, 30),
        TransformConfig::color(ColorMode::Grayscale),
        TransformConfig::to_tensor(ChannelOrder::CHW),
        TransformConfig::rescale(255.0),
        TransformConfig::normalize(vec![0.5], vec![0.5], ChannelOrder::CHW),
    ])
    .unwrap();

    let frame = gradient(100, 70);
    let predicted = preprocessor.output_shape(&frame.shape()).unwrap();
    let tensor = preprocessor.apply(frame).unwrap();
    assert_eq!(&predicted, tensor.shape());
    assert_eq!(predicted, TensorShape::known(&[1, 30, 40]));
    assert!(tensor.data().iter().all(|v| v.abs() <= 1.0 + 1e-5));
}

#[test]
fn normalize_against_wrong_channel_count_is_rejected() {
    let gray = ImageFrame::from_raw(2, 2, ColorMode::Grayscale, vec![0, 64, 128, 255]).unwrap();
    let op = ToTensor::new(ChannelOrder::CHW).then(
        Normalize::new(vec![0.1, 0.2, 0.3], vec![1.0; 3], ChannelOrder::CHW).unwrap(),
    );
    assert!(op.apply(gray.clone()).unwrap_err().is_configuration());
    assert!(
        op.transform_shape(gray.shape())
            .unwrap_err()
            .is_configuration()
    );
}

#[test]
fn unknown_channel_dimension_is_a_shape_error() {
    let normalize = Normalize::new(vec![0.5], vec![0.5], ChannelOrder::CHW).unwrap();
    let err = normalize
        .transform_shape(TensorShape::new(vec![-1, 4, 4]).unwrap())
        .unwrap_err();
    assert!(err.is_shape());
}

#[test]
fn preprocessor_is_shared_across_threads() {
    let preprocessor = Preprocessor::from_configs(&[
        TransformConfig::resize(8, 8),
        TransformConfig::to_tensor(ChannelOrder::HWC),
        TransformConfig::rescale(255.0),
    ])
    .unwrap();
    let frame = gradient(20, 20);
    let expected = preprocessor.apply(frame.clone()).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| preprocessor.apply(frame.clone()).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn bgr_conversion_is_idempotent_and_keeps_size() {
    let to_bgr = ColorConvert::new(ColorMode::Bgr);
    let once = to_bgr.apply(gradient(9, 5)).unwrap();
    let twice = to_bgr.apply(once.clone()).unwrap();
    assert_eq!(once, twice);
    assert_eq!((once.width(), once.height()), (9, 5));

    let tensor = ToTensor::new(ChannelOrder::HWC).apply(once).unwrap();
    // Pixel (1, 0) is RGB [7, 0, 1], stored as BGR.
    assert_close(tensor.data()[3], 1.0, 0.0);
    assert_close(tensor.data()[5], 7.0, 0.0);
}
