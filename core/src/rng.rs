//! Jitter sources for the layout engine.
//!
//! RULE: layout never calls a platform RNG directly. All randomness
//! flows through a `JitterSource` handed in by the caller, so tests
//! can pin the seed and production can seed from the clock.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// A stream of bounded offsets used to perturb node positions.
pub trait JitterSource {
    /// Offset uniformly drawn from `[-max, max]`.
    fn offset(&mut self, max: f64) -> f64;
}

/// Reproducible PCG-backed jitter.
pub struct SeededJitter {
    seed:  u64,
    inner: Pcg64Mcg,
}

impl SeededJitter {
    pub fn new(seed: u64) -> Self {
        Self { seed, inner: Pcg64Mcg::seed_from_u64(seed) }
    }

    /// Seed from wall-clock time. For production layouts only.
    pub fn from_clock() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self::new(nanos)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

impl JitterSource for SeededJitter {
    fn offset(&mut self, max: f64) -> f64 {
        if max <= 0.0 {
            return 0.0;
        }
        (self.next_f64() * 2.0 - 1.0) * max
    }
}

/// No perturbation at all. Positions land exactly on their ring.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    fn offset(&mut self, _max: f64) -> f64 {
        0.0
    }
}
