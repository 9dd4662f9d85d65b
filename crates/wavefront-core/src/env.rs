//! Environment abstraction for deterministic testing.
//!
//! Decouples the overlay's logic from system resources (time, randomness),
//! the single seam the concurrency model (§5) relies on: every component
//! that needs "now" or "a fresh random flow-id" goes through this trait, so
//! a simulation environment can drive the whole workspace on a virtual
//! clock with seeded randomness instead of wall-clock time and OS entropy.

use std::time::Duration;

/// Abstract environment providing time, randomness, and sleep.
///
/// # Safety
///
/// Implementations MUST guarantee:
///
/// - `now()` never goes backwards within one execution.
/// - `random_bytes()` uses cryptographically secure entropy in production;
///   the only property the overlay consumes is uniqueness with high
///   probability (§9 "Random flow-ids"), but a weak source would make an
///   adversary's collision attempts cheap.
pub trait Environment: Clone + Send + Sync + 'static {
    /// The instant type used by this environment.
    ///
    /// Production uses `std::time::Instant`; a simulation environment uses
    /// virtual time.
    type Instant: Copy + Ord + Send + Sync + std::ops::Sub<Output = Duration>;

    /// Current time (monotonic).
    fn now(&self) -> Self::Instant;

    /// Sleeps for the specified duration. The sole async method in the
    /// trait — used by driver code for the deferred-free timer (§4.1, §5),
    /// never by pure protocol logic.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;

    /// Fills the buffer with random bytes.
    ///
    /// Given the same seed, a simulation environment must produce the same
    /// sequence every run.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// A random `u64`, used for flow-ids (§4.2, §4.3).
    fn random_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        self.random_bytes(&mut bytes);
        u64::from_be_bytes(bytes)
    }
}
