//! Photo classification context around an external inference backend
//!
//! [`Classifier`] owns the model configuration, the preprocessing fallback
//! chain and an [`InferenceBackend`]. The backend is the only part that runs
//! the model; everything else here is preprocessing and score ranking.
//!
//! # Example
//! ```
//! use photo_tensor_classifier::{Classifier, ClassifierError, InferenceBackend, ModelConfig};
//! use photo_tensor_common::NormalizedTensor;
//!
//! struct Uniform(usize);
//!
//! impl InferenceBackend for Uniform {
//!     fn forward(&mut self, _input: &NormalizedTensor) -> Result<Vec<f32>, ClassifierError> {
//!         Ok(vec![0.0; self.0])
//!     }
//! }
//!
//! # fn main() -> Result<(), ClassifierError> {
//! let config = ModelConfig::new("meals", vec!["salad".into(), "soup".into()]);
//! let mut classifier = Classifier::new(config, Uniform(2))?;
//! let result = classifier.classify("AAECAwQF")?;
//! assert_eq!(result.predictions.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod config;

pub use config::{InputSpec, ModelConfig};

use photo_tensor_common::NormalizedTensor;
use photo_tensor_preprocess::{FallbackChain, Tier};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur during classification
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Inference backend error: {0}")]
    Backend(String),

    #[error("Invalid model output shape: expected {expected} scores, got {actual}")]
    InvalidOutputShape { expected: usize, actual: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Inference runtime seam: one forward pass per tensor
pub trait InferenceBackend {
    /// Run the model and return one score per label
    fn forward(&mut self, input: &NormalizedTensor) -> Result<Vec<f32>, ClassifierError>;
}

/// Labeled prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: String,
    pub confidence: f32,
}

/// Classification result for one photo
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    /// Top predictions, most confident first
    pub predictions: Vec<Prediction>,
    /// Preprocessing tier that produced the model input
    pub tier: Tier,
    /// True when the input came from a fallback tier
    pub degraded: bool,
}

/// Classification context: configuration, preprocessing and backend
pub struct Classifier<B> {
    config: ModelConfig,
    chain: FallbackChain,
    backend: B,
}

impl<B: InferenceBackend> Classifier<B> {
    /// Create a classifier with the standard fallback chain
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the configuration does not validate.
    pub fn new(config: ModelConfig, backend: B) -> Result<Self, ClassifierError> {
        Self::with_chain(config, FallbackChain::standard(), backend)
    }

    /// Create a classifier with a custom fallback chain
    pub fn with_chain(
        config: ModelConfig,
        chain: FallbackChain,
        backend: B,
    ) -> Result<Self, ClassifierError> {
        config.validate()?;
        Ok(Self {
            config,
            chain,
            backend,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Release the backend
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Preprocess a payload and classify it
    ///
    /// Preprocessing never fails; errors come only from the backend or a
    /// score vector that does not match the label list.
    pub fn classify(&mut self, payload: &str) -> Result<Classification, ClassifierError> {
        let outcome = self.chain.run(payload);
        if outcome.is_degraded() {
            warn!(
                "Classifying degraded input ({} tier, {} failures)",
                outcome.tier,
                outcome.failures.len()
            );
        }

        let scores = self.backend.forward(&outcome.tensor)?;
        let predictions = self.rank(&scores)?;

        debug!(
            "Top prediction: {:?}",
            predictions.first().map(|p| (&p.label, p.confidence))
        );

        Ok(Classification {
            predictions,
            tier: outcome.tier,
            degraded: outcome.is_degraded(),
        })
    }

    /// Turn raw scores into ranked, labeled predictions
    pub fn rank(&self, scores: &[f32]) -> Result<Vec<Prediction>, ClassifierError> {
        if scores.len() != self.config.labels.len() {
            return Err(ClassifierError::InvalidOutputShape {
                expected: self.config.labels.len(),
                actual: scores.len(),
            });
        }

        let probabilities = if self.config.apply_softmax {
            softmax(scores)
        } else {
            scores.to_vec()
        };

        Ok(top_k(&probabilities, &self.config.labels, self.config.top_k)
            .into_iter()
            .filter(|p| p.confidence >= self.config.min_confidence)
            .collect())
    }
}

/// Numerically stable softmax
#[must_use]
pub fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|&s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum == 0.0 || !sum.is_finite() {
        return vec![0.0; scores.len()];
    }
    exps.into_iter().map(|e| e / sum).collect()
}

/// Highest `k` probabilities with their labels, most confident first
///
/// Equal probabilities keep label order.
#[must_use]
pub fn top_k(probabilities: &[f32], labels: &[String], k: usize) -> Vec<Prediction> {
    let mut ranked: Vec<(usize, f32)> = probabilities.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
        .into_iter()
        .take(k)
        .filter_map(|(i, confidence)| {
            labels.get(i).map(|label| Prediction {
                label: label.clone(),
                confidence,
            })
        })
        .collect()
}
