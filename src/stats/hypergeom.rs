//! The hypergeometric distribution, computed in log space
//!
//! Point probabilities are calculated from log-factorials that are cached
//! and extended on demand, so that repeated tests over the same population
//! reuse earlier work.
//!
//! # Examples
//!
//! ```
//! use goenrichment::stats::hypergeom::Hypergeometric;
//!
//! let mut hyper = Hypergeometric::new();
//!
//! // 3 of 10 drawn items are successes, with 5 successes in a population of 50
//! let p = hyper.probability(3, 10, 5, 50);
//! assert!((p - 0.0442).abs() < 0.0001);
//!
//! // P(X > 2): the chance of drawing 3 or more successes
//! let tail = hyper.upper_tail(2, 10, 5, 50);
//! assert!(tail > p);
//! assert!((hyper.lower_tail(2, 10, 5, 50) + tail - 1.0).abs() < 1e-12);
//! ```

use crate::f64_from_usize;

/// Calculates point and tail probabilities of hypergeometric distributions
///
/// The distribution is parametrized per call:
/// - `sample_successes` (`k`): the number of successes in the sample
/// - `sample_size` (`n`): the number of draws
/// - `population_successes` (`K`): the number of successes in the population
/// - `population_size` (`N`): the size of the population
#[derive(Debug, Clone)]
pub struct Hypergeometric {
    ln_factorials: Vec<f64>,
}

impl Default for Hypergeometric {
    fn default() -> Self {
        Self::new()
    }
}

impl Hypergeometric {
    /// Constructs a new `Hypergeometric` with an empty log-factorial cache
    pub fn new() -> Self {
        Self {
            ln_factorials: vec![0.0, 0.0],
        }
    }

    /// Calculates `P(X = k)`
    ///
    /// # Formula
    ///
    /// ```text
    /// (K choose k) * (N-K choose n-k) / (N choose n)
    /// ```
    ///
    /// Returns `0` for every combination that cannot occur, e.g. more
    /// successes in the sample than in the population.
    pub fn probability(
        &mut self,
        sample_successes: usize,
        sample_size: usize,
        population_successes: usize,
        population_size: usize,
    ) -> f64 {
        if sample_successes > population_successes
            || sample_successes > sample_size
            || population_successes > population_size
            || sample_size - sample_successes > population_size - population_successes
        {
            return 0.0;
        }
        let ln_p = self.ln_binomial(population_successes, sample_successes)
            + self.ln_binomial(
                population_size - population_successes,
                sample_size - sample_successes,
            )
            - self.ln_binomial(population_size, sample_size);
        ln_p.exp().max(0.0)
    }

    /// Calculates `P(X > k)`, the survival function
    ///
    /// The result is capped at `1` to absorb accumulated rounding errors.
    pub fn upper_tail(
        &mut self,
        sample_successes: usize,
        sample_size: usize,
        population_successes: usize,
        population_size: usize,
    ) -> f64 {
        let upper = sample_size.min(population_successes);
        let mut p = 0.0;
        for successes in (sample_successes + 1)..=upper {
            p += self.probability(
                successes,
                sample_size,
                population_successes,
                population_size,
            );
        }
        p.min(1.0)
    }

    /// Calculates `P(X <= k)`, the cumulative distribution function
    ///
    /// The result is floored at `0`.
    pub fn lower_tail(
        &mut self,
        sample_successes: usize,
        sample_size: usize,
        population_successes: usize,
        population_size: usize,
    ) -> f64 {
        (1.0 - self.upper_tail(
            sample_successes,
            sample_size,
            population_successes,
            population_size,
        ))
        .max(0.0)
    }

    /// `ln(n choose k)`, requires `k <= n`
    fn ln_binomial(&mut self, n: usize, k: usize) -> f64 {
        self.ln_factorial(n) - self.ln_factorial(k) - self.ln_factorial(n - k)
    }

    fn ln_factorial(&mut self, i: usize) -> f64 {
        while self.ln_factorials.len() <= i {
            let j = self.ln_factorials.len();
            let previous = self.ln_factorials[j - 1];
            self.ln_factorials.push(previous + f64_from_usize(j).ln());
        }
        self.ln_factorials[i]
    }
}
