//! Byte-level statistics: brightness/contrast, entropy and dominant colors
//!
//! Every function here is a pure function of the raw payload bytes. Work is
//! bounded by fixed sample caps regardless of payload size.

use photo_tensor_common::{PALETTE_SAMPLE_CAP, PALETTE_SIZE, QUANTIZATION_STEP, STATS_SAMPLE_CAP};
use serde::Serialize;
use std::collections::HashMap;

/// Brightness and contrast summary of the sampled bytes
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ByteStatistics {
    /// Rounded mean of the sample (0-255)
    pub avg_brightness: u8,
    /// `1 + (max - min) / 255`, never below 1.0
    pub contrast_factor: f64,
    /// `(mean - 128) * 0.3`
    pub brightness_offset: f64,
}

impl ByteStatistics {
    /// Statistics used when there is nothing to sample
    pub const NEUTRAL: Self = Self {
        avg_brightness: 128,
        contrast_factor: 1.0,
        brightness_offset: 0.0,
    };
}

/// Normalized Shannon entropy in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct EntropyScore(f64);

impl EntropyScore {
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

/// Quantized RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PaletteColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PaletteColor {
    /// Snap each channel to the lower edge of its 32-wide bucket
    #[must_use]
    pub fn quantized(r: u8, g: u8, b: u8) -> Self {
        let q = |v: u8| (v / QUANTIZATION_STEP) * QUANTIZATION_STEP;
        Self {
            r: q(r),
            g: q(g),
            b: q(b),
        }
    }

    #[must_use]
    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Palette color with the number of sampled triplets that fell in its bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    pub color: PaletteColor,
    pub count: usize,
}

/// Up to three most frequent quantized colors, most frequent first
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DominantColorPalette {
    entries: Vec<PaletteEntry>,
}

impl DominantColorPalette {
    #[must_use]
    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Palette color for a normalized scan position `p` in [0, 1)
    #[must_use]
    pub fn color_at(&self, position: f64) -> Option<PaletteColor> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        let index = ((position * self.entries.len() as f64).floor().max(0.0) as usize).min(last);
        Some(self.entries[index].color)
    }
}

/// All statistics derived from one payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageStatistics {
    pub bytes: ByteStatistics,
    pub entropy: EntropyScore,
    pub palette: DominantColorPalette,
}

impl ImageStatistics {
    #[must_use]
    pub fn analyze(bytes: &[u8]) -> Self {
        Self {
            bytes: byte_statistics(bytes),
            entropy: entropy_score(bytes),
            palette: dominant_colors(bytes),
        }
    }
}

/// Evenly strided sample of at most `STATS_SAMPLE_CAP` bytes
fn sample(bytes: &[u8]) -> impl Iterator<Item = u8> + '_ {
    let stride = bytes.len().div_ceil(STATS_SAMPLE_CAP).max(1);
    bytes.iter().copied().step_by(stride).take(STATS_SAMPLE_CAP)
}

/// Compute brightness and contrast over the sampled bytes
#[must_use]
pub fn byte_statistics(bytes: &[u8]) -> ByteStatistics {
    let mut count = 0usize;
    let mut sum = 0u64;
    let mut min = u8::MAX;
    let mut max = u8::MIN;

    for value in sample(bytes) {
        count += 1;
        sum += u64::from(value);
        min = min.min(value);
        max = max.max(value);
    }

    if count == 0 {
        return ByteStatistics::NEUTRAL;
    }

    let mean = sum as f64 / count as f64;
    let range = f64::from(max - min);
    let contrast_factor = if range > 0.0 { 1.0 + range / 255.0 } else { 1.0 };

    ByteStatistics {
        avg_brightness: mean.round() as u8,
        contrast_factor,
        brightness_offset: (mean - 128.0) * 0.3,
    }
}

/// Normalized Shannon entropy of the sampled byte histogram
#[must_use]
pub fn entropy_score(bytes: &[u8]) -> EntropyScore {
    let mut histogram = [0usize; 256];
    let mut total = 0usize;
    for value in sample(bytes) {
        histogram[value as usize] += 1;
        total += 1;
    }

    if total == 0 {
        return EntropyScore::new(0.0);
    }

    let total = total as f64;
    let entropy: f64 = histogram
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum();

    // log2(256) = 8 bits is the ceiling for a byte alphabet
    EntropyScore::new(entropy / 8.0)
}

/// Most frequent quantized colors among sampled byte triplets
#[must_use]
pub fn dominant_colors(bytes: &[u8]) -> DominantColorPalette {
    let triplets = bytes.len() / 3;
    if triplets == 0 {
        return DominantColorPalette::default();
    }

    let stride = triplets.div_ceil(PALETTE_SAMPLE_CAP).max(1);

    // Vec keeps first-seen order; the map only indexes into it
    let mut entries: Vec<PaletteEntry> = Vec::new();
    let mut index: HashMap<PaletteColor, usize> = HashMap::new();

    for t in (0..triplets).step_by(stride).take(PALETTE_SAMPLE_CAP) {
        let base = t * 3;
        let color = PaletteColor::quantized(bytes[base], bytes[base + 1], bytes[base + 2]);
        match index.get(&color) {
            Some(&i) => entries[i].count += 1,
            None => {
                index.insert(color, entries.len());
                entries.push(PaletteEntry { color, count: 1 });
            }
        }
    }

    // Stable sort: equal counts stay in first-seen order
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(PALETTE_SIZE);

    DominantColorPalette { entries }
}
