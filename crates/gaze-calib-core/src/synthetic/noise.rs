//! Reproducible gaze jitter for synthetic sessions.
//!
//! Every record index maps to its own noise draw through a stateless hash, so
//! a record keeps the same jitter no matter how many records are generated
//! around it or in what order they are visited.

use crate::{Real, Vec2};

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;
const SECOND_AXIS: u64 = 0x94D0_49BB_1331_11EB;
const CHANNEL_STRIDE: u64 = 0xD6E8_FEB8_6659_FD93;

/// Uniform jitter in `[-max_abs, +max_abs]` on each screen axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformPixelNoise {
    /// Seed selecting the jitter pattern.
    pub seed: u64,
    /// Largest jitter per axis, in screen units. Zero disables the noise.
    pub max_abs: Real,
}

impl Default for UniformPixelNoise {
    fn default() -> Self {
        Self {
            seed: 0,
            max_abs: 0.0,
        }
    }
}

impl UniformPixelNoise {
    pub fn new(seed: u64, max_abs: Real) -> Self {
        Self { seed, max_abs }
    }

    /// Gaze jitter for record `record_idx`.
    pub fn sample(&self, record_idx: usize) -> Vec2 {
        if self.is_silent() {
            return Vec2::zeros();
        }
        let key = record_key(self.seed, record_idx);
        Vec2::new(self.spread(hash(key)), self.spread(hash(key ^ SECOND_AXIS)))
    }

    /// Scalar jitter for record `record_idx` on an independent `channel`,
    /// e.g. a perturbed head translation.
    pub fn sample_scalar(&self, record_idx: usize, channel: u64) -> Real {
        if self.is_silent() {
            return 0.0;
        }
        let seed = self.seed ^ channel.wrapping_mul(CHANNEL_STRIDE);
        self.spread(hash(record_key(seed, record_idx)))
    }

    fn is_silent(&self) -> bool {
        self.max_abs == 0.0
    }

    /// Map a hash onto `[-max_abs, +max_abs]`.
    fn spread(&self, bits: u64) -> Real {
        let unit = (bits >> 11) as Real / (1u64 << 53) as Real;
        (2.0 * unit - 1.0) * self.max_abs.abs()
    }
}

fn record_key(seed: u64, record_idx: usize) -> u64 {
    seed ^ (record_idx as u64).wrapping_mul(GOLDEN_GAMMA)
}

/// SplitMix64 finalizer.
fn hash(key: u64) -> u64 {
    let mut z = key.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(SECOND_AXIS);
    z ^ (z >> 31)
}
