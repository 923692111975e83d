//! Random number sources for the generators
//!
//! Every generator takes `&mut impl Rng`, so tests and replays pass a seeded
//! `Pcg32` while the live shell seeds one from the system source.

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Deterministic generator for a known seed
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Generator seeded from the thread-local system source
pub fn from_entropy() -> Pcg32 {
    Pcg32::from_rng(&mut rand::rng())
}

/// Seeded when a seed is configured, otherwise from entropy
pub fn for_seed(seed: Option<u64>) -> Pcg32 {
    match seed {
        Some(seed) => seeded(seed),
        None => from_entropy(),
    }
}
