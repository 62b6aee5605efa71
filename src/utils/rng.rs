// src/utils/rng.rs - Seed derivation for independent RNG streams

use rand_chacha::ChaCha20Rng;
use rand::SeedableRng;

/// Stream reserved for the sweep generator of a run.
pub const SWEEP_STREAM: u64 = 1;

/// Deterministic RNG for an independent stream derived from `master`.
///
/// Mixes the stream id into the master seed with a SplitMix64 finalizer so
/// neighbouring ids give unrelated ChaCha seeds.
pub fn stream_rng(master: u64, stream: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(stream_seed(master, stream))
}

/// The raw seed behind [`stream_rng`].
pub fn stream_seed(master: u64, stream: u64) -> u64 {
    let mut x = master ^ stream.wrapping_mul(0x9E3779B97F4A7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}
