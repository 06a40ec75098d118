//! Random number sources
//!
//! Two independent streams are used:
//! - a session stream, seeded from OS entropy, for apple placement and the
//!   autopilot's tie-breaks
//! - a key stream, seeded from a constant derived at compile time, that only
//!   feeds the high score cipher key
//!
//! Each component that needs randomness owns its own handle.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_chacha::ChaCha20Rng;

/// Gameplay randomness
pub type GameRng = StdRng;

/// Deterministic stream for key material
pub type KeyRng = ChaCha20Rng;

/// Seed for the key stream, fixed for a given crate name and version
pub const BUILD_SEED: u64 = fnv1a(concat!(
    env!("CARGO_PKG_NAME"),
    "@",
    env!("CARGO_PKG_VERSION")
));

/// Fresh non-deterministic gameplay stream
pub fn session_rng() -> GameRng {
    StdRng::from_entropy()
}

/// Gameplay stream with a fixed seed (tests, reproducible runs)
pub fn seeded_rng(seed: u64) -> GameRng {
    StdRng::seed_from_u64(seed)
}

/// Key stream seeded with [`BUILD_SEED`]
pub fn key_stream() -> KeyRng {
    ChaCha20Rng::seed_from_u64(BUILD_SEED)
}

/// 64-bit FNV-1a, usable in const context
pub const fn fnv1a(input: &str) -> u64 {
    let bytes = input.as_bytes();
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        i += 1;
    }
    hash
}
