//! Deterministic [`Environment`]: a virtual clock and a seeded RNG, so a
//! whole cluster can be driven reproducibly from one seed.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::RngCore;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wavefront_core::Environment;

/// Simulation environment: `sleep` advances the virtual clock instantly
/// rather than waiting, and randomness is drawn from a seeded CSPRNG so a
/// run is exactly reproducible given its seed.
#[derive(Clone)]
pub struct SimEnv {
    elapsed: Arc<Mutex<Duration>>,
    rng: Arc<Mutex<ChaCha8Rng>>,
}

impl SimEnv {
    /// A fresh environment seeded for reproducibility.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            elapsed: Arc::new(Mutex::new(Duration::ZERO)),
            rng: Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))),
        }
    }
}

impl Environment for SimEnv {
    type Instant = Duration;

    fn now(&self) -> Self::Instant {
        *self.elapsed.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        let elapsed = Arc::clone(&self.elapsed);
        async move {
            let mut guard = elapsed.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            *guard += duration;
        }
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        self.rng.lock().unwrap_or_else(std::sync::PoisonError::into_inner).fill_bytes(buffer);
    }
}
