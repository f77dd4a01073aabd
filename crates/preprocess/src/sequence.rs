//! Content-seeded deterministic number sequence

use photo_tensor_common::HASH_PREFIX_CHARS;
use serde::Serialize;

const LCG_MULTIPLIER: u64 = 9301;
const LCG_INCREMENT: u64 = 49297;
const LCG_MODULUS: u64 = 233_280;

/// 32-bit seed derived from payload content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ContentSeed(u32);

impl ContentSeed {
    /// Rolling hash (`hash * 31 + code`) over the first 1000 UTF-16 code units
    /// of the payload, wrapped to 32 bits with the sign stripped.
    #[must_use]
    pub fn from_payload(payload: &str) -> Self {
        let hash = payload
            .encode_utf16()
            .take(HASH_PREFIX_CHARS)
            .fold(0i32, |hash, code| {
                hash.wrapping_mul(31).wrapping_add(i32::from(code))
            });
        Self(hash.unsigned_abs())
    }

    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for ContentSeed {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Linear congruential generator yielding values in [0, 1)
///
/// Each preprocessing call owns its own instance; identical seeds produce
/// identical sequences.
#[derive(Debug, Clone)]
pub struct SeededSequence {
    state: u64,
}

impl SeededSequence {
    #[must_use]
    pub fn new(seed: ContentSeed) -> Self {
        Self {
            state: u64::from(seed.value()) % LCG_MODULUS,
        }
    }

    /// Advance the generator and return the next value in [0, 1)
    pub fn next_unit(&mut self) -> f64 {
        self.state = (self.state * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
        self.state as f64 / LCG_MODULUS as f64
    }
}

impl Iterator for SeededSequence {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.next_unit())
    }
}
