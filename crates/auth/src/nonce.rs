//! Monotonic nonce generation for API-key request signing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Strictly increasing nonce sequence shared by all clones of a credential.
///
/// The API rejects a signature whose nonce is not greater than the last
/// one it accepted for the key, so nonce reuse is a hard failure and a
/// replay vector. Deriving nonces directly from the wall clock is not
/// strictly monotonic under rapid concurrent calls on systems with coarse
/// clock resolution; instead the sequence is an atomic counter seeded
/// from the clock once, at construction.
#[derive(Debug)]
pub struct NonceSequence {
    next: AtomicU64,
}

impl NonceSequence {
    /// Create a sequence seeded from the current wall clock (microseconds).
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_micros() as u64;

        Self::with_seed(seed)
    }

    /// Create a sequence starting at an explicit value.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            next: AtomicU64::new(seed),
        }
    }

    /// Return the next nonce. Strictly increasing across all callers
    /// holding a reference to this sequence.
    pub fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl Default for NonceSequence {
    fn default() -> Self {
        Self::new()
    }
}
