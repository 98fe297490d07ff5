//! Engine-owned pseudo random generator.

use core::cell::Cell;

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// SplitMix64 generator with interior mutability.
///
/// Randomness is only needed for `rand`/`randOf` and template instance
/// birth, so a small non-cryptographic generator is enough.
#[derive(Debug, Clone)]
pub struct Rng {
    state: Cell<u64>,
}

impl Rng {
    pub const fn new(seed: u64) -> Self {
        Self {
            state: Cell::new(seed),
        }
    }

    #[inline]
    const fn mix(x: u64) -> u64 {
        let mut z = x;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    pub fn next_u64(&self) -> u64 {
        let next = self.state.get().wrapping_add(GOLDEN_GAMMA);
        self.state.set(next);
        Self::mix(next)
    }

    pub fn next_u32(&self) -> u32 {
        #[allow(clippy::cast_possible_truncation)]
        {
            (self.next_u64() >> 32) as u32
        }
    }

    /// Uniform float in `[0, 1)`
    #[allow(clippy::cast_precision_loss)]
    pub fn next_f32(&self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform integer in `[low, high]` (bounds may be given in any order)
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn range_inclusive(&self, low: i32, high: i32) -> i32 {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        let span = (i64::from(high) - i64::from(low) + 1) as u64;
        low.wrapping_add((self.next_u64() % span) as i32)
    }

    /// Bernoulli trial, `true` with the given probability
    pub fn chance(&self, probability: f32) -> bool {
        if probability <= 0.0 {
            return false;
        }
        self.next_f32() < probability
    }
}

impl Default for Rng {
    fn default() -> Self {
        Self::new(GOLDEN_GAMMA)
    }
}
