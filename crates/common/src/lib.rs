/// Common types, constants and errors for the photo preprocessing pipeline
use thiserror::Error;

pub mod tensor;

pub use tensor::{NormalizedTensor, TensorDType, TensorError};

/// Side length of the square model input (pixels)
pub const INPUT_SIZE: u32 = 224;

/// Number of color channels fed to the model (RGB, alpha is dropped)
pub const CHANNELS: usize = 3;

/// Tensor shape in NCHW order
pub const TENSOR_SHAPE: [usize; 4] = [1, CHANNELS, INPUT_SIZE as usize, INPUT_SIZE as usize];

/// Number of float32 values in a normalized tensor (3 * 224 * 224)
pub const TENSOR_LEN: usize = CHANNELS * INPUT_SIZE as usize * INPUT_SIZE as usize;

/// ImageNet per-channel mean (RGB)
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// ImageNet per-channel standard deviation (RGB)
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Maximum number of bytes sampled for brightness, contrast and entropy
pub const STATS_SAMPLE_CAP: usize = 1000;

/// Maximum number of byte triplets sampled for the dominant color palette
pub const PALETTE_SAMPLE_CAP: usize = 300;

/// Maximum number of entries in the dominant color palette
pub const PALETTE_SIZE: usize = 3;

/// Bucket width used when quantizing palette channels (32 levels of 8)
pub const QUANTIZATION_STEP: u8 = 32;

/// Number of leading payload characters folded into the content seed
pub const HASH_PREFIX_CHARS: usize = 1000;

/// Value written to every element of the last-resort tensor
pub const CONSTANT_FALLBACK_VALUE: f32 = -0.5;

/// Preprocessing errors
///
/// Every variant is recoverable inside the fallback chain; none of them reach
/// callers of the top-level preprocessing operation.
#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Synthesis error: {0}")]
    SynthesisError(String),

    #[error("Normalization error: {0}")]
    NormalizationError(String),
}

impl From<TensorError> for PreprocessError {
    fn from(err: TensorError) -> Self {
        PreprocessError::NormalizationError(err.to_string())
    }
}

/// Result type for preprocessing operations
pub type Result<T> = std::result::Result<T, PreprocessError>;
