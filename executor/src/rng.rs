use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Randomness seam for the simulator. Every stochastic decision (variance
/// factors, failure rolls) draws through this trait so runs are exactly
/// reproducible from a seed.
pub trait PerturbationSource: Send {
    /// Uniform draw in [0, 1).
    fn unit(&mut self) -> f64;

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.unit() * (hi - lo)
    }
}

/// StdRng-backed source; seedable for reproducible backtests.
pub struct SeededSource {
    rng: StdRng,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl PerturbationSource for SeededSource {
    fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Always draws 0.5: variance factors collapse to exactly 1.0 and failure
/// rolls never fire. Used to pin down phase arithmetic in tests.
pub struct Midpoint;

impl PerturbationSource for Midpoint {
    fn unit(&mut self) -> f64 {
        0.5
    }
}
