//! Seeded RNG for reproducible simulated signals.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded random source for fake instruments.
pub struct FakeRng {
    inner: ChaCha8Rng,
}

impl FakeRng {
    /// Create a new RNG with optional seed.
    /// If seed is None, uses a random seed from the OS.
    pub fn new(seed: Option<u64>) -> Self {
        let inner = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { inner }
    }

    /// Uniform value in [0.0, 1.0)
    pub fn next_f64(&mut self) -> f64 {
        self.inner.gen()
    }

    /// Normal sample with mean 0 and the given standard deviation.
    ///
    /// Box-Muller transform over two uniform samples.
    pub fn gaussian(&mut self, std_dev: f64) -> f64 {
        if std_dev == 0.0 {
            return 0.0;
        }
        // 1 - u keeps the log argument in (0, 1]
        let u1 = 1.0 - self.next_f64();
        let u2 = self.next_f64();
        let radius = (-2.0 * u1.ln()).sqrt();
        std_dev * radius * (2.0 * std::f64::consts::PI * u2).cos()
    }

    /// `len` normal samples with mean 0 and the given variance.
    pub fn gaussian_samples(&mut self, variance: f64, len: usize) -> Vec<f64> {
        let mut samples = Vec::with_capacity(len);
        self.extend_gaussian(&mut samples, variance, len);
        samples
    }

    /// Append `len` normal samples with mean 0 and the given variance.
    pub fn extend_gaussian(&mut self, out: &mut Vec<f64>, variance: f64, len: usize) {
        let std_dev = variance.max(0.0).sqrt();
        out.extend((0..len).map(|_| self.gaussian(std_dev)));
    }
}

impl Default for FakeRng {
    fn default() -> Self {
        Self::new(None)
    }
}

impl std::fmt::Debug for FakeRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeRng")
            .field("inner", &"<ChaCha8Rng>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_rng_deterministic() {
        let mut rng1 = FakeRng::new(Some(42));
        let mut rng2 = FakeRng::new(Some(42));

        assert_eq!(
            rng1.gaussian_samples(1.0, 16),
            rng2.gaussian_samples(1.0, 16),
            "Same seed should produce same values"
        );
    }

    #[test]
    fn test_next_f64_range() {
        let mut rng = FakeRng::new(Some(7));
        for _ in 0..100 {
            let val = rng.next_f64();
            assert!((0.0..1.0).contains(&val), "f64 should be in [0.0, 1.0)");
        }
    }

    #[test]
    fn test_gaussian_moments() {
        let mut rng = FakeRng::new(Some(1234));
        let samples = rng.gaussian_samples(4.0, 20_000);
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;

        assert!(mean.abs() < 0.1, "mean was {}", mean);
        assert!((variance - 4.0).abs() < 0.3, "variance was {}", variance);
    }

    #[test]
    fn test_zero_variance_is_silent() {
        let mut rng = FakeRng::new(Some(1));
        assert!(rng.gaussian_samples(0.0, 10).iter().all(|&x| x == 0.0));
    }
}
