//! RGBA grid to NCHW float32 conversion with ImageNet normalization

use crate::synth::PixelGrid;
use ndarray::Array4;
use photo_tensor_common::{
    NormalizedTensor, PreprocessError, Result, CHANNELS, IMAGENET_MEAN, IMAGENET_STD, INPUT_SIZE,
};

/// Normalize a single 8-bit channel value
#[inline]
#[must_use]
pub fn normalize_channel(value: u8, channel: usize) -> f32 {
    (f32::from(value) / 255.0 - IMAGENET_MEAN[channel]) / IMAGENET_STD[channel]
}

/// Convert a pixel grid to a `[1, 3, 224, 224]` tensor, discarding alpha
///
/// # Errors
/// Returns `NormalizationError` if the grid has the wrong size or the
/// resulting tensor fails validation.
pub fn normalize(grid: &PixelGrid) -> Result<NormalizedTensor> {
    let image = grid.as_image();
    let (width, height) = image.dimensions();
    if width != INPUT_SIZE || height != INPUT_SIZE {
        return Err(PreprocessError::NormalizationError(format!(
            "Expected {INPUT_SIZE}x{INPUT_SIZE} grid, got {width}x{height}"
        )));
    }

    let size = INPUT_SIZE as usize;
    let mut array = Array4::<f32>::zeros((1, CHANNELS, size, size));

    for (x, y, pixel) in image.enumerate_pixels() {
        for c in 0..CHANNELS {
            array[[0, c, y as usize, x as usize]] = normalize_channel(pixel[c], c);
        }
    }

    Ok(NormalizedTensor::from_array(array)?)
}
