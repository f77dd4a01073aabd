//! Photo Tensor - photo payload preprocessing for on-device classification
//!
//! Facade over the workspace crates:
//! - [`common`]: fixed constants, errors and the validated tensor type
//! - [`pipeline`]: payload to tensor pipeline with its fallback chain
//! - [`classifier`]: model configuration and inference backend seam

pub use photo_tensor_classifier as classifier;
pub use photo_tensor_common as common;
pub use photo_tensor_preprocess as pipeline;

pub use photo_tensor_common::{NormalizedTensor, PreprocessError};
pub use photo_tensor_preprocess::{
    preprocess, preprocess_batch, preprocess_with_outcome, try_preprocess, BatchResult,
    PreprocessOutcome, Tier,
};
