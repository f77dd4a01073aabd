//! Pixel synthesis from payload byte statistics
//!
//! The payload is never decompressed. Pixel values are reconstructed from
//! the compressed byte stream itself: byte pairs sampled along the scan give
//! the base color, the entropy score adds texture and the dominant palette
//! biases the hue. The result is deterministic for identical bytes.

use crate::stats::{ByteStatistics, DominantColorPalette, EntropyScore, ImageStatistics};
use image::{Rgba, RgbaImage};
use photo_tensor_common::{PreprocessError, Result, INPUT_SIZE};

/// Per-channel scale of the spatial texture term (R, G, B)
const VARIATION_SCALE: [f64; 3] = [10.0, 8.0, 12.0];

/// Scan-position multipliers selecting the R, G and B byte offsets
const CHANNEL_OFFSETS: [f64; 3] = [1.0, 0.7, 1.3];

/// Weight of the neighbouring byte when combining a pair
const PAIR_WEIGHT: f64 = 0.3;

/// Weight of the palette color when blending
const PALETTE_WEIGHT: f64 = 0.3;

/// Fixed 224x224 RGBA grid with opaque alpha
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid(RgbaImage);

impl PixelGrid {
    /// Opaque black grid
    #[must_use]
    pub fn new() -> Self {
        Self(RgbaImage::from_pixel(
            INPUT_SIZE,
            INPUT_SIZE,
            Rgba([0, 0, 0, u8::MAX]),
        ))
    }

    /// Wrap an existing image
    ///
    /// # Errors
    /// Returns `SynthesisError` if the image is not 224x224.
    pub fn from_image(image: RgbaImage) -> Result<Self> {
        if image.dimensions() != (INPUT_SIZE, INPUT_SIZE) {
            let (w, h) = image.dimensions();
            return Err(PreprocessError::SynthesisError(format!(
                "Pixel grid must be {INPUT_SIZE}x{INPUT_SIZE}, got {w}x{h}"
            )));
        }
        Ok(Self(image))
    }

    pub fn put(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        self.0.put_pixel(x, y, Rgba([rgb[0], rgb[1], rgb[2], u8::MAX]));
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.0.get_pixel(x, y).0
    }

    #[must_use]
    pub fn as_image(&self) -> &RgbaImage {
        &self.0
    }

    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.0
    }
}

impl Default for PixelGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// Weighted byte pair at a normalized scan position, `None` if too short
fn sample_pair(bytes: &[u8], position: f64) -> Option<f64> {
    if bytes.len() < 2 {
        return None;
    }
    let len = bytes.len();
    let index = ((position * len as f64).floor() as usize) % len;
    let next = (index + 1) % len;
    Some(f64::from(bytes[index]) * (1.0 - PAIR_WEIGHT) + f64::from(bytes[next]) * PAIR_WEIGHT)
}

/// Synthesize a pixel grid from raw bytes and their statistics
///
/// # Errors
/// Returns `SynthesisError` if the statistics produce a non-finite channel
/// value.
pub fn synthesize(
    bytes: &[u8],
    stats: &ByteStatistics,
    entropy: EntropyScore,
    palette: &DominantColorPalette,
) -> Result<PixelGrid> {
    let entropy = entropy.value();
    let gain = stats.contrast_factor + (entropy - 0.5) * 0.2;
    let offset = stats.brightness_offset;
    if !gain.is_finite() || !offset.is_finite() {
        return Err(PreprocessError::SynthesisError(format!(
            "Non-finite tone curve (gain={gain}, offset={offset})"
        )));
    }

    let fallback = f64::from(stats.avg_brightness);
    let total = f64::from(INPUT_SIZE * INPUT_SIZE);
    let mut grid = PixelGrid::new();

    for y in 0..INPUT_SIZE {
        for x in 0..INPUT_SIZE {
            let i = y * INPUT_SIZE + x;
            let p = f64::from(i) / total;

            let mut rgb = CHANNEL_OFFSETS.map(|k| sample_pair(bytes, p * k).unwrap_or(fallback));

            let variation = entropy * (0.1 * f64::from(x)).sin() * (0.1 * f64::from(y)).cos();
            for (value, scale) in rgb.iter_mut().zip(VARIATION_SCALE) {
                *value += variation * scale;
            }

            if let Some(color) = palette.color_at(p) {
                for (value, tint) in rgb.iter_mut().zip(color.channels()) {
                    *value = *value * (1.0 - PALETTE_WEIGHT) + f64::from(tint) * PALETTE_WEIGHT;
                }
            }

            let mut out = [0u8; 3];
            for (slot, value) in out.iter_mut().zip(rgb) {
                let toned = (value * gain + offset).floor();
                if !toned.is_finite() {
                    return Err(PreprocessError::SynthesisError(format!(
                        "Non-finite channel value at ({x}, {y})"
                    )));
                }
                *slot = toned.clamp(0.0, 255.0) as u8;
            }
            grid.put(x, y, out);
        }
    }

    Ok(grid)
}

/// Convenience wrapper over [`synthesize`] taking bundled statistics
pub fn synthesize_from_statistics(bytes: &[u8], stats: &ImageStatistics) -> Result<PixelGrid> {
    synthesize(bytes, &stats.bytes, stats.entropy, &stats.palette)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_pair() {
        assert_eq!(sample_pair(&[], 0.5), None);
        assert_eq!(sample_pair(&[9], 0.5), None);
        let v = sample_pair(&[100, 200], 0.0).unwrap();
        assert!((v - 130.0).abs() < 1e-9);
        // Last index wraps to the first byte
        let v = sample_pair(&[100, 200], 0.9).unwrap();
        assert!((v - 170.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_zero_bytes_clamp_to_black() {
        let bytes = vec![0u8; 3000];
        let stats = ImageStatistics::analyze(&bytes);
        let grid = synthesize_from_statistics(&bytes, &stats).unwrap();
        for (_, _, pixel) in grid.as_image().enumerate_pixels() {
            assert_eq!(pixel.0, [0, 0, 0, 255]);
        }
    }

    #[test]
    fn test_uniform_mid_gray() {
        // mean 128: no offset, zero entropy, gain 0.9 -> floor(128 * 0.9)
        let bytes = vec![128u8; 3000];
        let stats = ImageStatistics::analyze(&bytes);
        let grid = synthesize_from_statistics(&bytes, &stats).unwrap();
        assert_eq!(grid.pixel(0, 0), [115, 115, 115, 255]);
        assert_eq!(grid.pixel(223, 223), [115, 115, 115, 255]);
    }

    #[test]
    fn test_single_byte_uses_average_brightness() {
        let bytes = [200u8];
        let stats = ImageStatistics::analyze(&bytes);
        assert!(stats.palette.is_empty());
        let grid = synthesize_from_statistics(&bytes, &stats).unwrap();
        // 200 * 0.9 + (200 - 128) * 0.3 = 201.6
        assert_eq!(grid.pixel(10, 10), [201, 201, 201, 255]);
    }

    #[test]
    fn test_alpha_is_opaque_and_deterministic() {
        let bytes: Vec<u8> = (0..6000u32).map(|i| (i * 7919 % 256) as u8).collect();
        let stats = ImageStatistics::analyze(&bytes);
        let a = synthesize_from_statistics(&bytes, &stats).unwrap();
        let b = synthesize_from_statistics(&bytes, &stats).unwrap();
        assert_eq!(a, b);
        assert!(a.as_image().pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn test_non_finite_statistics_rejected() {
        let stats = ByteStatistics {
            avg_brightness: 0,
            contrast_factor: f64::NAN,
            brightness_offset: 0.0,
        };
        let result = synthesize(
            &[1, 2, 3],
            &stats,
            EntropyScore::new(0.5),
            &DominantColorPalette::default(),
        );
        assert!(matches!(result, Err(PreprocessError::SynthesisError(_))));
    }

    #[test]
    fn test_texture_palette_and_channel_offsets() {
        // Two palette colors: (0, 96, 192) then (32, 128, 224), one count each
        let bytes = [10u8, 101, 200, 51, 150, 250];
        let palette = crate::stats::dominant_colors(&bytes);
        assert_eq!(palette.len(), 2);
        let stats = ByteStatistics {
            avg_brightness: 127,
            contrast_factor: 1.1,
            brightness_offset: 2.5,
        };
        // gain = 1.1 + (0.8 - 0.5) * 0.2 = 1.16
        let grid = synthesize(&bytes, &stats, EntropyScore::new(0.8), &palette).unwrap();

        // Origin: no texture, pair (10, 101) = 37.3 on every channel,
        // blended 70/30 with the first palette color
        assert_eq!(grid.pixel(0, 0), [32, 66, 99, 255]);

        // p ~= 0.269: R, G and B read pairs at indices 1, 1 and 2,
        // texture 0.8 * sin(4.7) * cos(6.0) scaled by 10, 8 and 12
        assert_eq!(grid.pixel(47, 60), [102, 137, 187, 255]);

        // p ~= 0.600: indices 3, 2 and 4, second palette color
        assert_eq!(grid.pixel(100, 134), [76, 171, 223, 255]);

        // p ~= 0.852: indices 5, 3 and 6 mod 6 = 0
        assert_eq!(grid.pixel(200, 190), [164, 117, 117, 255]);
    }

    #[test]
    fn test_grid_size_validated() {
        assert!(PixelGrid::from_image(RgbaImage::new(10, 10)).is_err());
        assert!(PixelGrid::from_image(RgbaImage::new(224, 224)).is_ok());
    }
}
