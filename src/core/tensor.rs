//! Tensor containers exchanged with the execution engine.

use crate::core::errors::{VisionError, VisionResult};
use crate::core::shape::TensorShape;
use ndarray::{ArrayD, ArrayViewD, IxDyn};

/// A flat `f32` buffer plus the shape describing it.
///
/// This is what `ToTensor` produces and what the execution engine consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatTensor {
    data: Vec<f32>,
    shape: TensorShape,
}

impl FloatTensor {
    /// Creates a tensor, checking that the buffer length matches the shape.
    ///
    /// # Errors
    ///
    /// Returns a shape error if the shape has an unknown dimension or if the
    /// element count differs from `data.len()`.
    pub fn new(data: Vec<f32>, shape: TensorShape) -> VisionResult<Self> {
        let expected = shape.num_elements()?;
        if expected != data.len() {
            return Err(VisionError::shape_error(format!(
                "tensor data has {} elements but shape {} needs {}",
                data.len(),
                shape,
                expected
            )));
        }
        Ok(Self { data, shape })
    }

    /// Flat data in row-major order.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Tensor shape.
    pub fn shape(&self) -> &TensorShape {
        &self.shape
    }

    /// Consumes the tensor and returns its parts.
    pub fn into_parts(self) -> (Vec<f32>, TensorShape) {
        (self.data, self.shape)
    }

    /// Applies `f` to every element, keeping the shape.
    pub fn map(mut self, f: impl Fn(f32) -> f32) -> Self {
        self.data.iter_mut().for_each(|v| *v = f(*v));
        self
    }

    /// Returns the same data with a leading batch dimension of one.
    pub fn batched(self) -> Self {
        let shape = self.shape.with_batch(1);
        Self {
            data: self.data,
            shape,
        }
    }

    /// Borrows the data as an ndarray view.
    pub fn view(&self) -> VisionResult<ArrayViewD<'_, f32>> {
        let dims = self.shape.to_usize()?;
        Ok(ArrayViewD::from_shape(IxDyn(&dims), &self.data)?)
    }
}

/// Named output tensors returned by the execution engine.
///
/// Entries keep the order in which the engine produced them, so `first()` is
/// stable for single-output models.
#[derive(Debug, Clone, Default)]
pub struct OutputTensors {
    entries: Vec<(String, ArrayD<f32>)>,
}

impl OutputTensors {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an output.
    pub fn insert(&mut self, name: impl Into<String>, tensor: ArrayD<f32>) {
        let name = name.into();
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = tensor;
        } else {
            self.entries.push((name, tensor));
        }
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, tensor: ArrayD<f32>) -> Self {
        self.insert(name, tensor);
        self
    }

    /// Looks up an output by name.
    ///
    /// # Errors
    ///
    /// Returns a decode error naming the available outputs when `name` is absent.
    pub fn get(&self, name: &str) -> VisionResult<&ArrayD<f32>> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t)
            .ok_or_else(|| VisionError::missing_output(name, &self.names()))
    }

    /// Looks up an output by name, or the first output when `name` is `None`.
    pub fn get_or_first(&self, name: Option<&str>) -> VisionResult<&ArrayD<f32>> {
        match name {
            Some(name) => self.get(name),
            None => self
                .first()
                .map(|(_, t)| t)
                .ok_or_else(|| VisionError::decode_error("engine returned no outputs")),
        }
    }

    /// First output in engine order.
    pub fn first(&self) -> Option<(&str, &ArrayD<f32>)> {
        self.entries.first().map(|(n, t)| (n.as_str(), t))
    }

    /// Output names in engine order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Number of outputs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when there are no outputs.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, tensor)` pairs in engine order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArrayD<f32>)> {
        self.entries.iter().map(|(n, t)| (n.as_str(), t))
    }
}

/// Flattens an output tensor in logical row-major order.
pub(crate) fn flat_values(tensor: &ArrayD<f32>) -> Vec<f32> {
    tensor.iter().copied().collect()
}

/// Removes leading axes of size one until the tensor has `rank` dimensions.
pub(crate) fn squeeze_leading(tensor: &ArrayD<f32>, rank: usize) -> Option<ArrayViewD<'_, f32>> {
    let mut view = tensor.view();
    while view.ndim() > rank {
        if view.shape()[0] != 1 {
            return None;
        }
        view = view.index_axis_move(ndarray::Axis(0), 0);
    }
    (view.ndim() == rank).then_some(view)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_tensor_checks_length() {
        let shape = TensorShape::known(&[2, 2]);
        assert!(FloatTensor::new(vec![0.0; 4], shape.clone()).is_ok());
        let err = FloatTensor::new(vec![0.0; 3], shape).unwrap_err();
        assert!(err.is_shape());
    }

    #[test]
    fn test_batched_prepends_dimension() {
        let t = FloatTensor::new(vec![1.0; 6], TensorShape::known(&[3, 2])).unwrap();
        assert_eq!(t.batched().shape(), &TensorShape::known(&[1, 3, 2]));
    }

    #[test]
    fn test_output_lookup_and_order() {
        let outputs = OutputTensors::new()
            .with("b", ArrayD::zeros(IxDyn(&[1])))
            .with("a", ArrayD::zeros(IxDyn(&[2])));
        assert_eq!(outputs.names(), vec!["b", "a"]);
        assert_eq!(outputs.first().map(|(n, _)| n), Some("b"));
        assert_eq!(outputs.get("a").unwrap().len(), 2);
        assert!(outputs.get("missing").unwrap_err().is_decode());
    }

    #[test]
    fn test_squeeze_leading() {
        let t = ArrayD::<f32>::zeros(IxDyn(&[1, 1, 17, 3]));
        assert_eq!(squeeze_leading(&t, 2).unwrap().shape(), &[17, 3]);
        let t = ArrayD::<f32>::zeros(IxDyn(&[2, 17, 3]));
        assert!(squeeze_leading(&t, 2).is_none());
    }
}
