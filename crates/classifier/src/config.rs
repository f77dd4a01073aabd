//! Model configuration loaded from YAML

use crate::ClassifierError;
use photo_tensor_common::{IMAGENET_MEAN, IMAGENET_STD, INPUT_SIZE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

const STAT_TOLERANCE: f32 = 1e-6;

/// Input expectations of the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSpec {
    /// Square input size in pixels
    pub size: u32,
    /// Per-channel normalization mean (RGB)
    pub mean: [f32; 3],
    /// Per-channel normalization std (RGB)
    pub std: [f32; 3],
}

impl Default for InputSpec {
    fn default() -> Self {
        Self {
            size: INPUT_SIZE,
            mean: IMAGENET_MEAN,
            std: IMAGENET_STD,
        }
    }
}

/// Classification model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model name
    pub name: String,

    /// Model version (informational)
    #[serde(default)]
    pub version: Option<String>,

    /// Class labels, in model output order
    pub labels: Vec<String>,

    /// Input expectations
    #[serde(default)]
    pub input: InputSpec,

    /// Number of predictions to return
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Whether raw scores are logits that need a softmax
    #[serde(default = "default_apply_softmax")]
    pub apply_softmax: bool,

    /// Predictions below this confidence are dropped
    #[serde(default)]
    pub min_confidence: f32,
}

fn default_top_k() -> usize {
    3
}

fn default_apply_softmax() -> bool {
    true
}

impl ModelConfig {
    /// Config with default input spec and ranking settings
    pub fn new(name: impl Into<String>, labels: Vec<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            labels,
            input: InputSpec::default(),
            top_k: default_top_k(),
            apply_softmax: default_apply_softmax(),
            min_confidence: 0.0,
        }
    }

    /// Parse and validate a YAML config
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ClassifierError> {
        let config: ModelConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML config file
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&contents)?;
        info!(
            "Loaded model config '{}' ({} labels) from {}",
            config.name,
            config.labels.len(),
            path.display()
        );
        Ok(config)
    }

    /// Check the config against the fixed preprocessing pipeline
    ///
    /// # Errors
    /// Returns `InvalidConfig` if labels are missing, `top_k` is zero, the
    /// confidence floor is outside [0, 1], or the input spec differs from the
    /// 224x224 ImageNet-normalized tensor the pipeline produces.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if self.labels.is_empty() {
            return Err(ClassifierError::InvalidConfig(
                "labels must not be empty".to_string(),
            ));
        }
        if self.top_k == 0 {
            return Err(ClassifierError::InvalidConfig(
                "top_k must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ClassifierError::InvalidConfig(format!(
                "min_confidence must be within [0, 1], got {}",
                self.min_confidence
            )));
        }
        if self.input.size != INPUT_SIZE {
            return Err(ClassifierError::InvalidConfig(format!(
                "input size {} is not supported (pipeline produces {INPUT_SIZE})",
                self.input.size
            )));
        }
        let matches = |a: [f32; 3], b: [f32; 3]| {
            a.iter().zip(b).all(|(x, y)| (x - y).abs() <= STAT_TOLERANCE)
        };
        if !matches(self.input.mean, IMAGENET_MEAN) || !matches(self.input.std, IMAGENET_STD) {
            return Err(ClassifierError::InvalidConfig(format!(
                "input normalization {:?}/{:?} differs from ImageNet statistics",
                self.input.mean, self.input.std
            )));
        }
        Ok(())
    }
}
