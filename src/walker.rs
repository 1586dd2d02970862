//! Walker's Alias Method for O(1) sampling from a discrete distribution.

use crate::error::ProbError;
use rand::Rng;

/// One alias-table slot: keep the slot's own index with probability
/// `threshold`, otherwise return `alias`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bucket {
    threshold: f64,
    alias: u32,
}

/// Alias table for discrete distribution sampling.
///
/// Buckets live in one contiguous vector. The table is immutable once built
/// and is released by dropping it.
#[derive(Debug, Clone)]
pub struct AliasTable {
    buckets: Vec<Bucket>,
}

impl AliasTable {
    /// Construct an alias table from non-negative weights. O(n).
    ///
    /// The weights need not be normalized; Zipf tables already are.
    pub fn new(weights: &[f64]) -> Result<Self, ProbError> {
        let n = weights.len();
        if n == 0 {
            return Err(ProbError::Empty);
        }
        if u32::try_from(n).is_err() {
            return Err(ProbError::TooLarge { len: n });
        }

        let mut sum = 0.0f64;
        for (i, &w) in weights.iter().enumerate() {
            if !w.is_finite() {
                return Err(ProbError::NonFinite { index: i });
            }
            if w.is_sign_negative() && w != 0.0 {
                return Err(ProbError::Negative { index: i, value: w });
            }
            sum += w;
        }
        if !sum.is_finite() || sum == 0.0 {
            return Err(ProbError::ZeroSum);
        }

        // Scale so average is 1.
        let mut scaled: Vec<f64> = weights.iter().map(|&w| w * n as f64 / sum).collect();

        let mut buckets: Vec<Bucket> = (0..n as u32)
            .map(|i| Bucket {
                threshold: 1.0,
                alias: i,
            })
            .collect();

        let mut small = Vec::with_capacity(n);
        let mut large = Vec::with_capacity(n);

        for (i, &p) in scaled.iter().enumerate() {
            if p < 1.0 {
                small.push(i as u32);
            } else {
                large.push(i as u32);
            }
        }

        while let (Some(s), Some(l)) = (small.pop(), large.pop()) {
            let (su, lu) = (s as usize, l as usize);
            buckets[su] = Bucket {
                threshold: scaled[su], // in [0,1)
                alias: l,
            };

            scaled[lu] = (scaled[lu] + scaled[su]) - 1.0;

            if scaled[lu] < 1.0 - 1e-15 {
                small.push(l);
            } else {
                large.push(l);
            }
        }

        // Leftovers are full buckets up to rounding error.
        for i in small.into_iter().chain(large) {
            buckets[i as usize] = Bucket {
                threshold: 1.0,
                alias: i,
            };
        }

        Ok(Self { buckets })
    }

    /// Draw a single index in O(1): one uniform bucket pick, one biased coin.
    #[inline]
    pub fn sample_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let i = rng.random_range(0..self.buckets.len());
        let u: f64 = rng.random();
        let b = self.buckets[i];
        if u < b.threshold { i } else { b.alias as usize }
    }

    /// Draw k samples, returning counts per index (useful for checks).
    #[cfg(test)]
    pub fn sample_counts<R: Rng + ?Sized>(&self, rng: &mut R, draws: usize) -> Vec<usize> {
        let mut counts = vec![0usize; self.buckets.len()];
        for _ in 0..draws {
            let i = self.sample_index(rng);
            counts[i] += 1;
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zipf::zipf_weights;
    use rand::{SeedableRng, rngs::StdRng};
    use rand_pcg::Pcg32;

    #[test]
    fn rejects_bad_inputs() {
        assert!(matches!(AliasTable::new(&[]), Err(ProbError::Empty)));
        assert!(matches!(
            AliasTable::new(&[0.0, 0.0]),
            Err(ProbError::ZeroSum)
        ));
        assert!(matches!(
            AliasTable::new(&[-0.1, 0.2]),
            Err(ProbError::Negative { .. })
        ));
        assert!(matches!(
            AliasTable::new(&[0.5, f64::NAN]),
            Err(ProbError::NonFinite { index: 1 })
        ));
    }

    #[test]
    fn roughly_matches_distribution() {
        let weights = [1.0, 2.0, 3.0, 4.0];
        let alias = AliasTable::new(&weights).unwrap();

        let mut rng = StdRng::seed_from_u64(42);
        let draws = 20_000usize;
        let counts = alias.sample_counts(&mut rng, draws);

        let sum_w: f64 = weights.iter().sum();
        for (i, &c) in counts.iter().enumerate() {
            let p = weights[i] / sum_w;
            let emp = c as f64 / draws as f64;
            assert!((emp - p).abs() < 0.05, "i={i} emp={emp} p={p}");
        }
    }

    #[test]
    fn zipf_draws_pass_chi_squared() {
        let probs = zipf_weights(10, 1.0).unwrap();
        let alias = AliasTable::new(&probs).unwrap();

        let mut rng = Pcg32::seed_from_u64(2024);
        let draws = 200_000usize;
        let counts = alias.sample_counts(&mut rng, draws);

        let chi2: f64 = counts
            .iter()
            .zip(&probs)
            .map(|(&c, &p)| {
                let expected = p * draws as f64;
                let d = c as f64 - expected;
                d * d / expected
            })
            .sum();
        // 9 degrees of freedom, p = 0.001
        assert!(chi2 < 27.88, "chi2={chi2} counts={counts:?}");
    }

    #[test]
    fn same_seed_same_indices() {
        let probs = zipf_weights(64, 0.8).unwrap();
        let alias = AliasTable::new(&probs).unwrap();
        let run = |seed| {
            let mut rng = Pcg32::seed_from_u64(seed);
            (0..1000).map(|_| alias.sample_index(&mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(run(9), run(9));
        assert!(run(9).iter().all(|&i| i < 64));
    }

    #[test]
    fn zero_weight_is_never_drawn() {
        let alias = AliasTable::new(&[1.0, 0.0, 1.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let counts = alias.sample_counts(&mut rng, 10_000);
        assert_eq!(counts[1], 0);
    }

    #[test]
    fn degenerate_singleton() {
        let alias = AliasTable::new(&[5.0]).unwrap();
        let mut rng = rand::rng();
        for _ in 0..1000 {
            assert_eq!(alias.sample_index(&mut rng), 0);
        }
    }
}
