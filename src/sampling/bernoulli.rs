//! Bernoulli (independent random) sampling

use tracing::debug;

use super::validate_rate;
use crate::random::{resolve_seed, SampleRng};
use crate::traits::{Result, RowFilter};

/// Keeps each row independently with probability `rate`
///
/// Exactly one uniform draw is made per row, in input order, whether or not
/// the row is kept. The same seed therefore replays the same decisions for
/// any rate.
///
/// # Example
///
/// ```
/// use csvsample::sampling::BernoulliFilter;
/// use csvsample::traits::RowFilter;
///
/// let mut filter = BernoulliFilter::new(0.5, Some(42)).unwrap();
/// let kept = (0..1000).filter(|&i| filter.keep(i + 2, "row").unwrap()).count();
/// assert!(kept > 400 && kept < 600);
/// ```
#[derive(Clone, Debug)]
pub struct BernoulliFilter {
    rate: f64,
    rng: SampleRng,
}

impl BernoulliFilter {
    /// Create a filter keeping rows with probability `rate`
    ///
    /// Fails with `InvalidParameter` if `rate` is not in [0, 1].
    pub fn new(rate: f64, seed: Option<u64>) -> Result<Self> {
        let rate = validate_rate(rate)?;
        let seed = resolve_seed(seed);
        debug!(rate, "bernoulli sampler");
        Ok(Self {
            rate,
            rng: SampleRng::new(seed),
        })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl RowFilter for BernoulliFilter {
    #[inline]
    fn keep(&mut self, _line: u64, _row: &str) -> Result<bool> {
        Ok(self.rng.uniform() < self.rate)
    }

    fn name(&self) -> &'static str {
        "random"
    }

    fn seed(&self) -> u64 {
        self.rng.seed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::SampleError;

    fn decisions(filter: &mut BernoulliFilter, n: u64) -> Vec<bool> {
        (0..n).map(|i| filter.keep(i + 2, "x").unwrap()).collect()
    }

    #[test]
    fn test_rate_bounds() {
        assert!(BernoulliFilter::new(0.0, Some(1)).is_ok());
        assert!(BernoulliFilter::new(1.0, Some(1)).is_ok());
        assert!(matches!(
            BernoulliFilter::new(1.2, Some(1)),
            Err(SampleError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_zero_rate_keeps_nothing() {
        let mut filter = BernoulliFilter::new(0.0, Some(3)).unwrap();
        assert!(decisions(&mut filter, 1000).iter().all(|&k| !k));
    }

    #[test]
    fn test_full_rate_keeps_everything() {
        let mut filter = BernoulliFilter::new(1.0, Some(3)).unwrap();
        assert!(decisions(&mut filter, 1000).iter().all(|&k| k));
    }

    #[test]
    fn test_reproducibility() {
        let mut f1 = BernoulliFilter::new(0.3, Some(42)).unwrap();
        let mut f2 = BernoulliFilter::new(0.3, Some(42)).unwrap();
        assert_eq!(decisions(&mut f1, 500), decisions(&mut f2, 500));
    }

    #[test]
    fn test_draw_per_row_at_every_rate() {
        // Draws advance identically whatever the rate, so a lower rate keeps
        // a subset of what a higher rate keeps under the same seed.
        let mut low = BernoulliFilter::new(0.2, Some(8)).unwrap();
        let mut high = BernoulliFilter::new(0.6, Some(8)).unwrap();

        let low = decisions(&mut low, 2000);
        let high = decisions(&mut high, 2000);
        for (l, h) in low.iter().zip(&high) {
            assert!(!l | h);
        }
    }

    #[test]
    fn test_seed_is_recorded() {
        let filter = BernoulliFilter::new(0.5, Some(77)).unwrap();
        assert_eq!(filter.seed(), 77);
        assert_eq!(filter.rate(), 0.5);
    }

    #[test]
    fn test_expected_fraction() {
        let mut filter = BernoulliFilter::new(0.1, Some(2024)).unwrap();
        let n = 100_000;
        let kept = decisions(&mut filter, n).iter().filter(|&&k| k).count();
        let frac = kept as f64 / n as f64;
        assert!((frac - 0.1).abs() < 0.01, "kept fraction {}", frac);
    }
}
