//! Statistical testing of GO term enrichment
//!
//! The analysis runs in three steps per [`Branch`](`crate::Branch`):
//!
//! 1. [`FisherExactTest`] counts the annotations of the study set and the
//!    population and calculates a raw p-value per term, using the
//!    [`hypergeom::Hypergeometric`] distribution
//! 2. a [`Correction`] procedure adjusts the p-values for multiple testing
//! 3. [`score`] combines the information content, the study fraction and
//!    the corrected p-value of every term
//!
//! All per-term statistics are collected in a [`TestResult`].

pub mod correction;
pub mod fisher;
pub mod hypergeom;
mod test_result;

pub use correction::Correction;
pub use fisher::FisherExactTest;
pub use test_result::{ResultRow, TestResult};

use crate::f64_from_usize;

/// Calculates the score of an enriched term
///
/// `information_content * study_count / study_total * ceil(-log10(corrected))`
///
/// The score favours specific terms (high information content) that cover
/// a large fraction of the study set with a strong enrichment. A corrected
/// p-value of `0` is treated as the smallest positive `f64`.
///
/// Returns `None` if the study set is empty.
///
/// # Examples
///
/// ```
/// use goenrichment::stats::score;
///
/// // 0.004 -> ceil(2.39) = 3
/// let value = score(0.5, 2, 4, 0.004).unwrap();
/// assert!((value - 0.75).abs() < 1e-12);
///
/// assert!(score(0.5, 0, 0, 0.004).is_none());
/// ```
pub fn score(
    information_content: f64,
    study_count: usize,
    study_total: usize,
    corrected: f64,
) -> Option<f64> {
    if study_total == 0 {
        return None;
    }
    let fraction = f64_from_usize(study_count) / f64_from_usize(study_total);
    let magnitude = (-corrected.max(f64::MIN_POSITIVE).log10()).ceil();
    Some(information_content * fraction * magnitude)
}
