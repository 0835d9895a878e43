//! Deterministic randomness.
//!
//! Every roll is a pure function of a seed. Callers derive the seed from the
//! session seed, a world-wide roll counter and the acting thing, so a replay
//! with the same session seed reproduces every roll.

/// Source of deterministic random numbers.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Classic 0..=255 roll used by chance checks (`P_Random`).
    fn byte(&self, seed: u64) -> i32 {
        (self.next_u32(seed) & 0xff) as i32
    }

    /// Difference of two byte rolls, in -255..=255. Used for spread.
    fn spread(&self, seed: u64) -> i32 {
        let value = self.next_u32(seed);
        (value & 0xff) as i32 - ((value >> 8) & 0xff) as i32
    }

    /// Value in `[min, max]` inclusive.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let range = max - min + 1;
        min + (self.next_u32(seed) % range)
    }
}

/// PCG-XSH-RR generator: 64-bit LCG state, 32-bit permuted output.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// Xorshift the high bits down, then rotate by the top five bits.
    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::output(Self::step(seed))
    }
}

/// Mixes the session seed, roll counter, thing serial and a per-roll context
/// value into one seed.
///
/// `context` separates several rolls made by the same action invocation
/// (for example hit angle versus damage).
pub fn compute_seed(game_seed: u64, nonce: u64, serial: u32, context: u32) -> u64 {
    let mut hash = game_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (serial as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    // SplitMix-style finalizer.
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}
