//! Core predictor functionality
//!
//! Every task-level predictor is the same composition: a [`Preprocessor`], an
//! execution engine and a decoder. [`ModelCore`] holds the three and runs them
//! in order, so individual predictors only add their task-specific decode call.

use crate::core::constants::DEFAULT_PARALLEL_THRESHOLD;
use crate::core::errors::VisionResult;
use crate::core::inference::InferenceEngine;
use crate::core::operation::Operation;
use crate::core::tensor::{FloatTensor, OutputTensors};
use crate::domain::image::ImageSource;
use crate::processors::decode::Decoder;
use crate::processors::preprocess::Preprocessor;

/// Preprocesses one source into a batched `[1, ...]` input tensor.
fn prepare(preprocessor: &Preprocessor, source: ImageSource) -> VisionResult<FloatTensor> {
    let frame = source.into_frame()?;
    Ok(preprocessor.apply(frame)?.batched())
}

/// Generic `preprocess -> execute -> decode` core.
///
/// The preprocessor and decoder are shared freely, but the engine needs
/// exclusive access, so every call that reaches the engine takes `&mut self`.
/// Wrap the predictor in a `Mutex` or open one engine per thread to serve
/// concurrent callers.
#[derive(Debug)]
pub struct ModelCore<E, D> {
    preprocessor: Preprocessor,
    engine: E,
    decoder: D,
    parallel_threshold: usize,
}

impl<E: InferenceEngine, D: Decoder> ModelCore<E, D> {
    /// Creates a core from its three parts.
    pub fn new(preprocessor: Preprocessor, engine: E, decoder: D) -> Self {
        Self {
            preprocessor,
            engine,
            decoder,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Batches larger than `threshold` images are preprocessed in parallel.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// The preprocessing operation.
    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    /// The decoder.
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// The execution engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Consumes the core and returns the engine.
    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Preprocesses `source` without running the engine.
    pub fn preprocess(&self, source: impl Into<ImageSource>) -> VisionResult<FloatTensor> {
        prepare(&self.preprocessor, source.into())
    }

    /// Preprocesses `source` and executes the engine on it.
    pub fn forward(&mut self, source: impl Into<ImageSource>) -> VisionResult<OutputTensors> {
        let input = self.preprocess(source)?;
        tracing::debug!(
            "{}: executing {} on input {}",
            self.decoder.task_type(),
            self.engine.engine_info(),
            input.shape()
        );
        self.engine.execute(&input)
    }

    /// Runs the whole chain, decoding with `decode`.
    pub fn run<T>(
        &mut self,
        source: impl Into<ImageSource>,
        decode: impl FnOnce(&D, &OutputTensors) -> VisionResult<T>,
    ) -> VisionResult<T> {
        let outputs = self.forward(source)?;
        decode(&self.decoder, &outputs)
    }

    /// Runs the chain over several images, returning one result per image.
    ///
    /// Preprocessing runs in parallel above the parallel threshold; engine
    /// calls stay sequential on the one session. A failure for one image does
    /// not stop the others.
    pub fn run_batch<S, T>(
        &mut self,
        sources: Vec<S>,
        decode: impl Fn(&D, &OutputTensors) -> VisionResult<T>,
    ) -> Vec<VisionResult<T>>
    where
        S: Into<ImageSource>,
    {
        let sources: Vec<ImageSource> = sources.into_iter().map(Into::into).collect();
        let preprocessor = &self.preprocessor;
        let inputs: Vec<VisionResult<FloatTensor>> = if sources.len() > self.parallel_threshold {
            use rayon::prelude::*;
            sources
                .into_par_iter()
                .map(|source| prepare(preprocessor, source))
                .collect()
        } else {
            sources
                .into_iter()
                .map(|source| prepare(preprocessor, source))
                .collect()
        };

        tracing::debug!(
            "{}: running batch of {} image(s)",
            self.decoder.task_type(),
            inputs.len()
        );

        let engine = &mut self.engine;
        let decoder = &self.decoder;
        inputs
            .into_iter()
            .map(|input| {
                let outputs = engine.execute(&input?)?;
                decode(decoder, &outputs)
            })
            .collect()
    }
}
