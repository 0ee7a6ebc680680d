//! Shared utilities for predictor builders.
//!
//! Every task predictor builder has the same structure: hold a
//! [`ModelConfig`] (starting from a preset), optionally accept an
//! `OrtSessionConfig`, and either open an ONNX Runtime engine or take a
//! caller-supplied one. This module centralises that shared logic so
//! individual builders only add their task-specific setters.

use crate::core::config::{ModelConfig, OrtSessionConfig};
use crate::core::errors::VisionResult;
use crate::core::inference::OrtEngine;
use std::path::Path;

/// Common state for predictor builders.
#[derive(Debug, Clone)]
pub struct PredictorBuilderState<C> {
    config: C,
    ort_config: Option<OrtSessionConfig>,
}

impl<C> PredictorBuilderState<C> {
    /// Creates a new builder state using the provided configuration.
    pub fn new(config: C) -> Self {
        Self {
            config,
            ort_config: None,
        }
    }

    /// Returns a mutable reference to the configuration for in-place updates.
    pub fn config_mut(&mut self) -> &mut C {
        &mut self.config
    }

    /// Overrides the stored configuration.
    pub fn set_config(&mut self, config: C) {
        self.config = config;
    }

    /// Overrides the stored OrtSessionConfig.
    pub fn set_ort_config(&mut self, config: OrtSessionConfig) {
        self.ort_config = Some(config);
    }

    /// Consumes the builder state and returns its parts.
    pub fn into_parts(self) -> (C, Option<OrtSessionConfig>) {
        (self.config, self.ort_config)
    }
}

/// Trait implemented by every predictor builder that uses `PredictorBuilderState`.
pub trait TaskPredictorBuilder: Sized {
    /// Configuration type associated with the builder.
    type Config: Clone;

    /// Mutable accessor for the underlying builder state.
    fn state_mut(&mut self) -> &mut PredictorBuilderState<Self::Config>;

    /// Replaces the stored configuration.
    fn with_config(mut self, config: Self::Config) -> Self {
        self.state_mut().set_config(config);
        self
    }

    /// Stores the provided `OrtSessionConfig`.
    fn with_ort_config(mut self, config: OrtSessionConfig) -> Self {
        self.state_mut().set_ort_config(config);
        self
    }
}

/// Opens an ONNX Runtime engine for `config`.
///
/// Session options set on the builder win over the ones stored in the model
/// configuration.
pub(crate) fn open_engine(
    config: &ModelConfig,
    ort_config: Option<OrtSessionConfig>,
    model_path: &Path,
) -> VisionResult<OrtEngine> {
    let session = ort_config
        .or_else(|| config.session.clone())
        .unwrap_or_default();
    tracing::info!(
        "Building {} predictor '{}' from {}",
        config.task_type(),
        config.model_name,
        model_path.display()
    );
    OrtEngine::with_config(model_path, &session)
}

/// Implements `TaskPredictorBuilder` for a builder with a `state` field and
/// exposes `with_config`/`with_ort_config` as inherent methods.
macro_rules! impl_task_predictor_builder {
    ($builder:ty, $config:ty) => {
        impl crate::predictors::builder::TaskPredictorBuilder for $builder {
            type Config = $config;

            fn state_mut(
                &mut self,
            ) -> &mut crate::predictors::builder::PredictorBuilderState<Self::Config> {
                &mut self.state
            }
        }

        impl $builder {
            /// Replace the full model configuration used by this builder.
            pub fn with_config(self, config: $config) -> Self {
                <Self as crate::predictors::builder::TaskPredictorBuilder>::with_config(
                    self, config,
                )
            }

            /// Configure ONNX Runtime session options.
            pub fn with_ort_config(self, config: crate::core::config::OrtSessionConfig) -> Self {
                <Self as crate::predictors::builder::TaskPredictorBuilder>::with_ort_config(
                    self, config,
                )
            }
        }
    };
}

/// Pulls the expected decoder variant out of a model configuration.
macro_rules! expect_decoder {
    ($config:expr, $variant:ident, $what:literal) => {
        match &$config.decoder {
            crate::processors::decode::TaskDecoder::$variant(decoder) => decoder.clone(),
            other => {
                return Err(crate::core::errors::VisionError::config_error(format!(
                    "model '{}' is configured for {}, not {}",
                    $config.model_name,
                    crate::processors::decode::Decoder::task_type(other),
                    $what
                )));
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_state_parts() {
        let mut state = PredictorBuilderState::new(1u32);
        *state.config_mut() += 1;
        state.set_ort_config(OrtSessionConfig::new().with_intra_threads(2));
        let (config, ort) = state.into_parts();
        assert_eq!(config, 2);
        assert_eq!(ort.unwrap().intra_threads, Some(2));
    }

    struct ThresholdBuilder {
        state: PredictorBuilderState<f32>,
    }

    impl_task_predictor_builder!(ThresholdBuilder, f32);

    #[test]
    fn test_macro_setters_reach_state() {
        let builder = ThresholdBuilder {
            state: PredictorBuilderState::new(0.5),
        }
        .with_config(0.25)
        .with_ort_config(OrtSessionConfig::new().with_inter_threads(3));
        let (threshold, ort) = builder.state.into_parts();
        assert_eq!(threshold, 0.25);
        assert_eq!(ort.unwrap().inter_threads, Some(3));
    }
}
