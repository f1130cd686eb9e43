//! Multiple test correction procedures
//!
//! All procedures operate on a list of p-values that is sorted in
//! ascending order and return the corrected values in the same order.
//! Corrected values never exceed `1`.

use std::fmt::Display;
use std::str::FromStr;

use crate::{f64_from_usize, GoError};

/// A multiple test correction procedure
///
/// # Examples
///
/// ```
/// use goenrichment::stats::Correction;
///
/// let correction: Correction = "bonferroni-holm".parse().unwrap();
/// assert_eq!(correction, Correction::BonferroniHolm);
///
/// let corrected = correction.correct(&[0.01, 0.02, 0.03]);
/// assert_eq!(corrected, vec![0.03, 0.04, 0.04]);
///
/// assert!("fdr".parse::<Correction>().is_err());
/// ```
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum Correction {
    /// Single-step Bonferroni: `p * m`
    Bonferroni,
    /// Holm's step-down Bonferroni procedure
    BonferroniHolm,
    /// Single-step Sidak: `1 - (1 - p)^m`
    Sidak,
    /// Step-down Sidak procedure
    Sda,
    /// Benjamini-Hochberg step-up procedure, controls the false discovery rate
    #[default]
    BenjaminiHochberg,
}

impl Correction {
    /// All correction procedures
    pub const ALL: [Correction; 5] = [
        Correction::Bonferroni,
        Correction::BonferroniHolm,
        Correction::Sidak,
        Correction::Sda,
        Correction::BenjaminiHochberg,
    ];

    /// Returns the name of the procedure, e.g. `Benjamini-Hochberg`
    pub fn label(&self) -> &'static str {
        match self {
            Correction::Bonferroni => "Bonferroni",
            Correction::BonferroniHolm => "Bonferroni-Holm",
            Correction::Sidak => "Sidak",
            Correction::Sda => "SDA",
            Correction::BenjaminiHochberg => "Benjamini-Hochberg",
        }
    }

    /// Returns `true` if the corrected values are q-values (false discovery rates)
    pub fn is_fdr(&self) -> bool {
        matches!(self, Correction::BenjaminiHochberg)
    }

    /// Corrects a list of p-values sorted in ascending order
    ///
    /// Step-down and step-up procedures keep the corrected values monotonic
    /// with the rank of the p-value.
    pub fn correct(&self, pvalues: &[f64]) -> Vec<f64> {
        let m = f64_from_usize(pvalues.len());
        match self {
            Correction::Bonferroni => pvalues.iter().map(|p| (p * m).min(1.0)).collect(),
            Correction::BonferroniHolm => cumulative_max(
                pvalues
                    .iter()
                    .enumerate()
                    .map(|(i, p)| (p * (m - f64_from_usize(i))).min(1.0)),
            ),
            Correction::Sidak => pvalues.iter().map(|p| sidak(*p, m)).collect(),
            Correction::Sda => cumulative_max(
                pvalues
                    .iter()
                    .enumerate()
                    .map(|(i, p)| sidak(*p, m - f64_from_usize(i))),
            ),
            Correction::BenjaminiHochberg => {
                let mut corrected: Vec<f64> = pvalues
                    .iter()
                    .enumerate()
                    .map(|(i, p)| (p * m / f64_from_usize(i + 1)).min(1.0))
                    .collect();
                for i in (0..corrected.len().saturating_sub(1)).rev() {
                    if corrected[i] > corrected[i + 1] {
                        corrected[i] = corrected[i + 1];
                    }
                }
                corrected
            }
        }
    }
}

/// `1 - (1 - p)^n`, computed without cancellation for small `p`
fn sidak(p: f64, n: f64) -> f64 {
    if p >= 1.0 {
        return 1.0;
    }
    (-(n * (-p).ln_1p()).exp_m1()).clamp(0.0, 1.0)
}

fn cumulative_max<I: Iterator<Item = f64>>(values: I) -> Vec<f64> {
    let mut max = 0.0f64;
    values
        .map(|value| {
            max = max.max(value);
            max
        })
        .collect()
}

impl FromStr for Correction {
    type Err = GoError;

    /// Parses the name of a procedure, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Correction::ALL
            .into_iter()
            .find(|correction| correction.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| GoError::UnknownCorrection(s.to_string()))
    }
}

impl Display for Correction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
