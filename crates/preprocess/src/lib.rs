//! Photo preprocessing pipeline: base64 payload to normalized model tensor
//!
//! The pipeline turns the base64 payload of an already resized 224x224 photo
//! into a `[1, 3, 224, 224]` float32 tensor with ImageNet normalization.
//!
//! # Stages
//! - [`extract`]: base64 (optionally data-URI prefixed) to raw bytes
//! - [`stats`]: brightness/contrast, entropy and dominant colors of the bytes
//! - [`sequence`]: content-seeded deterministic sequence
//! - [`synth`]: pixel grid synthesized from byte statistics
//! - [`simulate`]: seeded pattern grid for unusable payloads
//! - [`normalize`]: grid to NCHW tensor
//! - [`fallback`]: primary, simulated and constant tiers; never fails
//! - [`batch`]: sequential batch processing with per-item isolation
//!
//! Pixel values are *approximated* from the compressed byte stream; no image
//! codec runs here.
//!
//! # Example
//! ```
//! use photo_tensor_preprocess::{preprocess, preprocess_with_outcome, Tier};
//!
//! let tensor = preprocess("data:image/png;base64,iVBORw0KGgo=");
//! assert_eq!(tensor.shape(), [1, 3, 224, 224]);
//!
//! let outcome = preprocess_with_outcome("not-base64!!");
//! assert_eq!(outcome.tier, Tier::Simulated);
//! ```

pub mod batch;
pub mod extract;
pub mod fallback;
pub mod normalize;
pub mod sequence;
pub mod simulate;
pub mod stats;
pub mod synth;

pub use batch::{preprocess_batch, BatchFailure, BatchItem, BatchResult};
pub use extract::{extract_bytes, strip_data_uri, RawBytes};
pub use fallback::{
    FallbackChain, PreprocessOutcome, PrimaryStrategy, SimulatedStrategy, TensorStrategy, Tier,
    TierFailure,
};
pub use normalize::normalize;
pub use sequence::{ContentSeed, SeededSequence};
pub use simulate::{simulate, simulate_payload};
pub use stats::{
    byte_statistics, dominant_colors, entropy_score, ByteStatistics, DominantColorPalette,
    EntropyScore, ImageStatistics, PaletteColor, PaletteEntry,
};
pub use synth::{synthesize, synthesize_from_statistics, PixelGrid};

use photo_tensor_common::{NormalizedTensor, Result};

/// Preprocess a payload through the standard fallback chain
///
/// Always returns a valid tensor; quality degrades silently when the payload
/// cannot be used.
#[must_use]
pub fn preprocess(payload: &str) -> NormalizedTensor {
    preprocess_with_outcome(payload).tensor
}

/// Like [`preprocess`], also reporting the tier used and earlier failures
#[must_use]
pub fn preprocess_with_outcome(payload: &str) -> PreprocessOutcome {
    FallbackChain::standard().run(payload)
}

/// Run the primary tier only
///
/// # Errors
/// Returns the first decode, synthesis or normalization error.
pub fn try_preprocess(payload: &str) -> Result<NormalizedTensor> {
    PrimaryStrategy.produce(payload)
}
