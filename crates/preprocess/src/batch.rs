//! Sequential batch preprocessing
//!
//! Items are processed one at a time to bound peak memory. Each item runs the
//! primary tier only; an item that fails is skipped and recorded without
//! affecting the rest of the batch.

use crate::fallback::{run_guarded, PrimaryStrategy, TensorStrategy};
use photo_tensor_common::{NormalizedTensor, PreprocessError};
use tracing::{info, warn};

/// Successfully preprocessed batch item
#[derive(Debug)]
pub struct BatchItem {
    /// Position of the payload in the input batch
    pub index: usize,
    pub tensor: NormalizedTensor,
}

/// Skipped batch item
#[derive(Debug)]
pub struct BatchFailure {
    pub index: usize,
    pub error: PreprocessError,
}

/// Batch result: successes in input order plus attempted/succeeded counts
#[derive(Debug, Default)]
pub struct BatchResult {
    pub items: Vec<BatchItem>,
    pub failures: Vec<BatchFailure>,
    pub attempted: usize,
    pub succeeded: usize,
}

impl BatchResult {
    /// Tensors of the successful items, in input order
    pub fn tensors(&self) -> impl Iterator<Item = &NormalizedTensor> {
        self.items.iter().map(|item| &item.tensor)
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded
    }
}

/// Preprocess payloads sequentially with the primary tier
pub fn preprocess_batch<S: AsRef<str>>(payloads: &[S]) -> BatchResult {
    run_batch(&PrimaryStrategy, payloads)
}

/// Run one strategy over every payload; a panicking item counts as a failure
fn run_batch<S: AsRef<str>>(strategy: &dyn TensorStrategy, payloads: &[S]) -> BatchResult {
    let mut result = BatchResult::default();

    for (index, payload) in payloads.iter().enumerate() {
        result.attempted += 1;
        match run_guarded(strategy, payload.as_ref()) {
            Ok(tensor) => {
                result.succeeded += 1;
                result.items.push(BatchItem { index, tensor });
            }
            Err(error) => {
                warn!("Skipping batch item {}: {}", index, error);
                result.failures.push(BatchFailure { index, error });
            }
        }
    }

    info!(
        "Batch preprocessing complete: {}/{} succeeded",
        result.succeeded, result.attempted
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_is_isolated() {
        let payloads = ["AAECAwQF", "%%%", "BgcICQoL"];
        let result = preprocess_batch(&payloads);
        assert_eq!(result.attempted, 3);
        assert_eq!(result.succeeded, 2);
        assert_eq!(result.failed(), 1);
        let indices: Vec<usize> = result.items.iter().map(|i| i.index).collect();
        assert_eq!(indices, vec![0, 2]);
        assert_eq!(result.failures[0].index, 1);
        assert_eq!(result.tensors().count(), 2);
    }

    struct PanicsOnMarker;

    impl TensorStrategy for PanicsOnMarker {
        fn tier(&self) -> crate::Tier {
            crate::Tier::Primary
        }

        fn produce(&self, payload: &str) -> photo_tensor_common::Result<NormalizedTensor> {
            if payload == "panic" {
                panic!("corrupt item");
            }
            PrimaryStrategy.produce(payload)
        }
    }

    #[test]
    fn test_panicking_item_is_isolated() {
        let payloads = ["AAECAwQF", "panic", "BgcICQoL"];
        let result = run_batch(&PanicsOnMarker, &payloads);
        assert_eq!(result.attempted, 3);
        assert_eq!(result.succeeded, 2);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].index, 1);
        match &result.failures[0].error {
            PreprocessError::SynthesisError(msg) => assert!(msg.contains("corrupt item")),
            other => panic!("unexpected error: {other:?}"),
        }
        let indices: Vec<usize> = result.items.iter().map(|i| i.index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn test_empty_batch() {
        let result = preprocess_batch::<&str>(&[]);
        assert_eq!(result.attempted, 0);
        assert_eq!(result.succeeded, 0);
        assert!(result.items.is_empty());
    }

    #[test]
    fn test_accepts_owned_strings() {
        let payloads = vec!["AAECAwQF".to_string()];
        assert_eq!(preprocess_batch(&payloads).succeeded, 1);
    }
}
