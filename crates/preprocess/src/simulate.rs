//! Hash-seeded pattern generation used when the payload bytes are unusable

use crate::sequence::{ContentSeed, SeededSequence};
use crate::synth::PixelGrid;
use photo_tensor_common::INPUT_SIZE;
use std::f64::consts::TAU;

const BASE_LEVEL: f64 = 128.0;
const WAVE_AMPLITUDE: f64 = 80.0;
const WAVE_FREQUENCY: f64 = 0.05;
const NOISE_AMPLITUDE: f64 = 40.0;

/// Generate a pattern grid from a content seed alone
///
/// Three phases (one per channel) are drawn first, then one noise value per
/// pixel in row-major order.
#[must_use]
pub fn simulate(seed: ContentSeed) -> PixelGrid {
    let mut sequence = SeededSequence::new(seed);
    let phases = [
        sequence.next_unit() * TAU,
        sequence.next_unit() * TAU,
        sequence.next_unit() * TAU,
    ];

    let mut grid = PixelGrid::new();
    for y in 0..INPUT_SIZE {
        for x in 0..INPUT_SIZE {
            let noise = (sequence.next_unit() - 0.5) * NOISE_AMPLITUDE;
            let rgb = phases.map(|phase| {
                let wave = (WAVE_FREQUENCY * f64::from(x) + phase).sin()
                    * (WAVE_FREQUENCY * f64::from(y) + phase).cos();
                (BASE_LEVEL + WAVE_AMPLITUDE * wave + noise).clamp(0.0, 255.0) as u8
            });
            grid.put(x, y, rgb);
        }
    }
    grid
}

/// Seed from the payload text and generate its pattern
#[must_use]
pub fn simulate_payload(payload: &str) -> PixelGrid {
    simulate(ContentSeed::from_payload(payload))
}
