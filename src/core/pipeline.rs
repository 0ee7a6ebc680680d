//! Homogeneous pipelines of boxed operations.

use crate::core::errors::VisionResult;
use crate::core::operation::Operation;
use crate::core::shape::TensorShape;
use std::fmt;

/// An ordered list of `T -> T` stages applied as one operation.
///
/// A pipeline with no stages is the identity. Stages are owned exclusively and
/// the pipeline is immutable once built.
pub struct Pipeline<T> {
    stages: Vec<Box<dyn Operation<T, T>>>,
}

impl<T> Pipeline<T> {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Creates a pipeline from boxed stages.
    pub fn from_stages(stages: Vec<Box<dyn Operation<T, T>>>) -> Self {
        Self { stages }
    }

    /// Appends a stage.
    pub fn stage(mut self, op: impl Operation<T, T> + 'static) -> Self {
        self.stages.push(Box::new(op));
        self
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true for the identity pipeline.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stage names in application order.
    pub fn stage_names(&self) -> Vec<String> {
        self.stages.iter().map(|s| s.name()).collect()
    }
}

impl<T> Default for Pipeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Pipeline<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

impl<T> Operation<T, T> for Pipeline<T> {
    fn apply(&self, input: T) -> VisionResult<T> {
        self.stages
            .iter()
            .try_fold(input, |value, stage| stage.apply(value))
    }

    fn transform_shape(&self, shape: TensorShape) -> VisionResult<TensorShape> {
        self.stages
            .iter()
            .try_fold(shape, |shape, stage| stage.transform_shape(shape))
    }

    fn name(&self) -> String {
        if self.stages.is_empty() {
            "Identity".to_string()
        } else {
            self.stage_names().join(" -> ")
        }
    }
}

impl<T> FromIterator<Box<dyn Operation<T, T>>> for Pipeline<T> {
    fn from_iter<I: IntoIterator<Item = Box<dyn Operation<T, T>>>>(iter: I) -> Self {
        Self::from_stages(iter.into_iter().collect())
    }
}
