//! Booking token generation.
//!
//! Randomness stays here; uniqueness against live bookings is checked by the
//! allocation service before a token is committed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::slot::{BOOKING_ID_ALPHABET, BOOKING_ID_LEN};

/// Draw `length` characters uniformly from `alphabet`.
///
/// Returns an empty string when `alphabet` is empty.
pub fn generate_token<R: Rng>(rng: &mut R, length: usize, alphabet: &[u8]) -> String {
    if alphabet.is_empty() {
        return String::new();
    }
    (0..length)
        .map(|_| char::from(alphabet[rng.random_range(0..alphabet.len())]))
        .collect()
}

/// Source of candidate booking tokens.
pub trait TokenSource: Send {
    /// Produce the next candidate token.
    fn next_token(&mut self) -> String;
}

/// Default token source backed by a seeded `StdRng`.
pub struct RandomTokenSource {
    rng: StdRng,
}

impl RandomTokenSource {
    /// Create a source seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Create a reproducible source.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomTokenSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenSource for RandomTokenSource {
    fn next_token(&mut self) -> String {
        generate_token(&mut self.rng, BOOKING_ID_LEN, BOOKING_ID_ALPHABET)
    }
}
