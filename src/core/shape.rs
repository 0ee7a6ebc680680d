//! Tensor shape descriptor used to validate and propagate shapes through transforms.

use crate::core::errors::{VisionError, VisionResult};
use std::fmt;

/// Marker value for a dimension whose size is not known statically.
pub const UNKNOWN_DIM: i64 = -1;

/// Ordered tensor dimensions.
///
/// Dimensions follow the ONNX convention: non-negative values are concrete sizes
/// and `-1` marks the single dimension allowed to be unknown (usually the batch).
/// A shape never owns or transforms data; it only describes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TensorShape {
    dims: Vec<i64>,
}

impl TensorShape {
    /// Creates a shape from raw dimensions.
    ///
    /// # Errors
    ///
    /// Returns a shape error if a dimension is below `-1` or if more than one
    /// dimension is unknown.
    pub fn new(dims: impl Into<Vec<i64>>) -> VisionResult<Self> {
        let dims = dims.into();
        if let Some(bad) = dims.iter().find(|&&d| d < UNKNOWN_DIM) {
            return Err(VisionError::shape_error(format!(
                "invalid dimension {} in {:?}",
                bad, dims
            )));
        }
        let unknown = dims.iter().filter(|&&d| d == UNKNOWN_DIM).count();
        if unknown > 1 {
            return Err(VisionError::shape_error(format!(
                "at most one unknown dimension is allowed, got {} in {:?}",
                unknown, dims
            )));
        }
        Ok(Self { dims })
    }

    /// Creates a shape whose dimensions are all known.
    pub fn known(dims: &[usize]) -> Self {
        Self {
            dims: dims.iter().map(|&d| d as i64).collect(),
        }
    }

    /// Creates a shape with an unknown leading batch dimension.
    pub fn with_unknown_batch(dims: &[usize]) -> Self {
        let mut all = Vec::with_capacity(dims.len() + 1);
        all.push(UNKNOWN_DIM);
        all.extend(dims.iter().map(|&d| d as i64));
        Self { dims: all }
    }

    /// Raw dimensions, `-1` for the unknown one.
    pub fn dims(&self) -> &[i64] {
        &self.dims
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Size of dimension `axis`, or `None` when out of range or unknown.
    pub fn dim(&self, axis: usize) -> Option<usize> {
        self.dims
            .get(axis)
            .filter(|&&d| d != UNKNOWN_DIM)
            .map(|&d| d as usize)
    }

    /// Size of the last dimension, or `None` when empty or unknown.
    pub fn last_dim(&self) -> Option<usize> {
        self.rank().checked_sub(1).and_then(|axis| self.dim(axis))
    }

    /// Returns true when no dimension is unknown.
    pub fn is_fully_known(&self) -> bool {
        !self.dims.contains(&UNKNOWN_DIM)
    }

    /// Product of all dimensions.
    ///
    /// # Errors
    ///
    /// Returns a shape error if any dimension is unknown.
    pub fn num_elements(&self) -> VisionResult<usize> {
        if !self.is_fully_known() {
            return Err(VisionError::shape_error(format!(
                "cannot count elements of shape {} with an unknown dimension",
                self
            )));
        }
        Ok(self.dims.iter().map(|&d| d as usize).product())
    }

    /// Known dimensions as `usize`.
    ///
    /// # Errors
    ///
    /// Returns a shape error if any dimension is unknown.
    pub fn to_usize(&self) -> VisionResult<Vec<usize>> {
        if !self.is_fully_known() {
            return Err(VisionError::shape_error(format!(
                "shape {} has an unknown dimension",
                self
            )));
        }
        Ok(self.dims.iter().map(|&d| d as usize).collect())
    }

    /// First dimension.
    pub fn head(&self) -> Option<i64> {
        self.dims.first().copied()
    }

    /// All dimensions after the first.
    pub fn tail(&self) -> TensorShape {
        Self {
            dims: self.dims.iter().skip(1).copied().collect(),
        }
    }

    /// Prepends a batch dimension of the given size.
    pub fn with_batch(&self, batch: usize) -> TensorShape {
        let mut dims = Vec::with_capacity(self.dims.len() + 1);
        dims.push(batch as i64);
        dims.extend_from_slice(&self.dims);
        Self { dims }
    }

    /// Returns a copy with dimension `axis` replaced.
    pub(crate) fn replace_dim(&self, axis: usize, value: usize) -> TensorShape {
        let mut dims = self.dims.clone();
        if let Some(d) = dims.get_mut(axis) {
            *d = value as i64;
        }
        Self { dims }
    }
}

impl fmt::Display for TensorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if *d == UNKNOWN_DIM {
                write!(f, "?")?;
            } else {
                write!(f, "{}", d)?;
            }
        }
        write!(f, "]")
    }
}

impl From<&[usize]> for TensorShape {
    fn from(dims: &[usize]) -> Self {
        Self::known(dims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_elements_known() {
        let shape = TensorShape::known(&[1, 3, 224, 224]);
        assert_eq!(shape.num_elements().unwrap(), 3 * 224 * 224);
        assert_eq!(shape.rank(), 4);
    }

    #[test]
    fn test_num_elements_unknown_fails() {
        let shape = TensorShape::with_unknown_batch(&[3, 224, 224]);
        let err = shape.num_elements().unwrap_err();
        assert!(err.is_shape());
    }

    #[test]
    fn test_only_one_unknown_dimension() {
        assert!(TensorShape::new(vec![-1, 3, -1]).is_err());
        assert!(TensorShape::new(vec![-1, 3, 8]).is_ok());
        assert!(TensorShape::new(vec![-2, 3]).is_err());
    }

    #[test]
    fn test_head_and_tail() {
        let shape = TensorShape::new(vec![-1, 17, 3]).unwrap();
        assert_eq!(shape.head(), Some(UNKNOWN_DIM));
        assert_eq!(shape.tail(), TensorShape::known(&[17, 3]));
        assert_eq!(TensorShape::known(&[]).head(), None);
    }

    #[test]
    fn test_structural_equality_and_display() {
        let a = TensorShape::new(vec![-1, 4]).unwrap();
        let b = TensorShape::with_unknown_batch(&[4]);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "[?, 4]");
        assert_eq!(TensorShape::known(&[2, 2]).with_batch(1).to_string(), "[1, 2, 2]");
    }

    #[test]
    fn test_dim_accessors() {
        let shape = TensorShape::new(vec![-1, 192, 192, 3]).unwrap();
        assert_eq!(shape.dim(0), None);
        assert_eq!(shape.dim(1), Some(192));
        assert_eq!(shape.last_dim(), Some(3));
        assert_eq!(shape.dim(9), None);
    }
}
