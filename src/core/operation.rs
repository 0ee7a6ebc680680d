//! The composition primitive for preprocessing.
//!
//! An [`Operation`] is a pure transform from one representation to another.
//! Operations compose with [`Chain`] (or [`OperationExt::then`]) into a new
//! operation whose `apply` runs the first stage and feeds its result into the
//! second, and whose shape transform is the composition of both shape
//! transforms.
//!
//! ```text
//! ImageFrame ──Resize──▶ ImageFrame ──ToTensor──▶ FloatTensor ──Normalize──▶ FloatTensor
//! ```
//!
//! Operations hold no caches or counters, so one instance can be applied from
//! many threads at once.

use crate::core::errors::VisionResult;
use crate::core::shape::TensorShape;
use std::fmt::{self, Debug};
use std::marker::PhantomData;

/// A reusable transform from `I` to `O`.
pub trait Operation<I, O>: Send + Sync + Debug {
    /// Transforms the input.
    ///
    /// Calling `apply` twice on equal inputs must give equal outputs.
    fn apply(&self, input: I) -> VisionResult<O>;

    /// Maps an input shape to the output shape, for static validation only.
    ///
    /// The default is the identity, which is also what an operation that does
    /// not care about shapes should return.
    fn transform_shape(&self, shape: TensorShape) -> VisionResult<TensorShape> {
        Ok(shape)
    }

    /// Short name used in logs.
    fn name(&self) -> String {
        std::any::type_name::<Self>()
            .rsplit("::")
            .next()
            .unwrap_or("operation")
            .to_string()
    }
}

impl<I, O> Operation<I, O> for Box<dyn Operation<I, O>> {
    fn apply(&self, input: I) -> VisionResult<O> {
        (**self).apply(input)
    }

    fn transform_shape(&self, shape: TensorShape) -> VisionResult<TensorShape> {
        (**self).transform_shape(shape)
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

/// The operation that returns its input unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl<T> Operation<T, T> for Identity {
    fn apply(&self, input: T) -> VisionResult<T> {
        Ok(input)
    }

    fn name(&self) -> String {
        "Identity".to_string()
    }
}

/// Two operations run back to back: `first` then `second`.
///
/// `M` is the intermediate type handed from one stage to the next.
pub struct Chain<A, B, M> {
    first: A,
    second: B,
    _intermediate: PhantomData<fn(M) -> M>,
}

impl<A, B, M> Chain<A, B, M> {
    /// Creates the composition `first` then `second`.
    pub fn new(first: A, second: B) -> Self {
        Self {
            first,
            second,
            _intermediate: PhantomData,
        }
    }

    /// The stage that runs first.
    pub fn first(&self) -> &A {
        &self.first
    }

    /// The stage that runs second.
    pub fn second(&self) -> &B {
        &self.second
    }
}

impl<A: Clone, B: Clone, M> Clone for Chain<A, B, M> {
    fn clone(&self) -> Self {
        Self::new(self.first.clone(), self.second.clone())
    }
}

impl<A: Debug, B: Debug, M> Debug for Chain<A, B, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("first", &self.first)
            .field("second", &self.second)
            .finish()
    }
}

impl<I, M, O, A, B> Operation<I, O> for Chain<A, B, M>
where
    A: Operation<I, M>,
    B: Operation<M, O>,
{
    fn apply(&self, input: I) -> VisionResult<O> {
        let intermediate = self.first.apply(input)?;
        self.second.apply(intermediate)
    }

    fn transform_shape(&self, shape: TensorShape) -> VisionResult<TensorShape> {
        let intermediate = self.first.transform_shape(shape)?;
        self.second.transform_shape(intermediate)
    }

    fn name(&self) -> String {
        format!("{} -> {}", self.first.name(), self.second.name())
    }
}

/// Composes `first` and `second` into a single operation.
pub fn compose<I, M, O, A, B>(first: A, second: B) -> Chain<A, B, M>
where
    A: Operation<I, M>,
    B: Operation<M, O>,
{
    Chain::new(first, second)
}

/// Fluent chaining for every operation.
pub trait OperationExt<I, O>: Operation<I, O> + Sized {
    /// Runs `self` and then `next`.
    fn then<R, B>(self, next: B) -> Chain<Self, B, O>
    where
        B: Operation<O, R>,
    {
        Chain::new(self, next)
    }

    /// Moves the operation behind a trait object.
    fn boxed(self) -> Box<dyn Operation<I, O>>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<I, O, T: Operation<I, O>> OperationExt<I, O> for T {}

/// An operation backed by a closure.
///
/// Useful for small custom stages and for tests.
pub struct FnOperation<F> {
    name: String,
    f: F,
}

impl<F> FnOperation<F> {
    /// Wraps `f` under the given name.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Debug for FnOperation<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnOperation")
            .field("name", &self.name)
            .finish()
    }
}

impl<I, O, F> Operation<I, O> for FnOperation<F>
where
    F: Fn(I) -> VisionResult<O> + Send + Sync,
{
    fn apply(&self, input: I) -> VisionResult<O> {
        (self.f)(input)
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

/// Wraps a closure as an [`Operation`].
pub fn from_fn<I, O, F>(name: impl Into<String>, f: F) -> FnOperation<F>
where
    F: Fn(I) -> VisionResult<O> + Send + Sync,
{
    FnOperation::new(name, f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::VisionError;

    fn add(n: i64) -> FnOperation<impl Fn(i64) -> VisionResult<i64> + Send + Sync> {
        from_fn(format!("add{n}"), move |x: i64| Ok(x + n))
    }

    #[derive(Debug)]
    struct Doubler;

    impl Operation<i64, i64> for Doubler {
        fn apply(&self, input: i64) -> VisionResult<i64> {
            Ok(input * 2)
        }

        fn transform_shape(&self, shape: TensorShape) -> VisionResult<TensorShape> {
            let last = shape.last_dim().unwrap_or(0);
            Ok(shape.replace_dim(shape.rank() - 1, last * 2))
        }
    }

    #[test]
    fn test_chain_runs_in_order() {
        let op = add(3).then(Doubler);
        assert_eq!(op.apply(1).unwrap(), 8);
        let op = Doubler.then(add(3));
        assert_eq!(op.apply(1).unwrap(), 5);
    }

    #[test]
    fn test_composition_is_associative() {
        let left = add(1).then(Doubler).then(add(-4));
        let right = add(1).then(Doubler.then(add(-4)));
        for x in [-7, 0, 5, 1000] {
            assert_eq!(left.apply(x).unwrap(), right.apply(x).unwrap());
        }
    }

    #[test]
    fn test_identity() {
        let op: &dyn Operation<String, String> = &Identity;
        assert_eq!(op.apply("frame".to_string()).unwrap(), "frame");
    }

    #[test]
    fn test_shape_composes_and_identity_when_unspecified() {
        let op = Doubler.then(add(1)).then(Doubler);
        let shape = op.transform_shape(TensorShape::known(&[2, 3])).unwrap();
        assert_eq!(shape, TensorShape::known(&[2, 12]));
    }

    #[test]
    fn test_error_short_circuits() {
        let fail = from_fn("fail", |_: i64| -> VisionResult<i64> {
            Err(VisionError::config_error("boom"))
        });
        let op = fail.then(Doubler);
        assert!(op.apply(1).unwrap_err().is_configuration());
    }

    #[test]
    fn test_names() {
        assert_eq!(Doubler.name(), "Doubler");
        assert_eq!(add(2).then(Doubler).name(), "add2 -> Doubler");
    }
}
