use std::fmt::Display;
use std::str::FromStr;

use crate::stats::Correction;
use crate::{GoError, GoResult, DEFAULT_CUT_OFF, SIGNIFICANCE_THRESHOLD};

/// Which relationships connect terms during annotation propagation,
/// redundancy checks and family reduction
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum RelationPolicy {
    /// Only `is_a` relationships
    #[default]
    IsAOnly,
    /// `is_a` and all named properties, e.g. `part_of`
    AllRelations,
}

impl RelationPolicy {
    /// Returns the name of the policy
    pub fn label(&self) -> &'static str {
        match self {
            RelationPolicy::IsAOnly => "is_a",
            RelationPolicy::AllRelations => "all",
        }
    }
}

impl FromStr for RelationPolicy {
    type Err = GoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "is_a" | "is-a" | "isa" => Ok(RelationPolicy::IsAOnly),
            "all" | "all_relations" | "all-relations" => Ok(RelationPolicy::AllRelations),
            _ => Err(GoError::InvalidOption(format!("unknown relation policy: {s}"))),
        }
    }
}

impl Display for RelationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Configuration of an [`Enrichment`](`crate::Enrichment`) run
///
/// # Examples
///
/// ```
/// use goenrichment::enrichment::{Options, RelationPolicy};
/// use goenrichment::stats::Correction;
///
/// let options = Options::default()
///     .correction(Correction::Bonferroni)
///     .relation_policy(RelationPolicy::AllRelations)
///     .exclude_singletons(true);
///
/// assert!(options.validate().is_ok());
/// assert!(Options::default().cut_off(1.5).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Options {
    correction: Correction,
    exclude_singletons: bool,
    relation_policy: RelationPolicy,
    cut_off: f64,
    significance_threshold: f64,
    summarize: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            correction: Correction::default(),
            exclude_singletons: false,
            relation_policy: RelationPolicy::default(),
            cut_off: DEFAULT_CUT_OFF,
            significance_threshold: SIGNIFICANCE_THRESHOLD,
            summarize: true,
        }
    }
}

impl Options {
    /// Sets the multiple test correction procedure
    #[must_use]
    pub fn correction(mut self, correction: Correction) -> Self {
        self.correction = correction;
        self
    }

    /// Sets whether terms with a study count of `1` are excluded from testing
    #[must_use]
    pub fn exclude_singletons(mut self, exclude: bool) -> Self {
        self.exclude_singletons = exclude;
        self
    }

    /// Sets the [`RelationPolicy`]
    #[must_use]
    pub fn relation_policy(mut self, policy: RelationPolicy) -> Self {
        self.relation_policy = policy;
        self
    }

    /// Sets the corrected p-value cut-off used for downstream filtering
    #[must_use]
    pub fn cut_off(mut self, cut_off: f64) -> Self {
        self.cut_off = cut_off;
        self
    }

    /// Sets the corrected p-value below which terms take part in families
    #[must_use]
    pub fn significance_threshold(mut self, threshold: f64) -> Self {
        self.significance_threshold = threshold;
        self
    }

    /// Sets whether families are built and reduced
    #[must_use]
    pub fn summarize(mut self, summarize: bool) -> Self {
        self.summarize = summarize;
        self
    }

    /// The multiple test correction procedure
    pub fn correction_procedure(&self) -> Correction {
        self.correction
    }

    /// Whether singleton terms are excluded
    pub fn excludes_singletons(&self) -> bool {
        self.exclude_singletons
    }

    /// The [`RelationPolicy`]
    pub fn policy(&self) -> RelationPolicy {
        self.relation_policy
    }

    /// The cut-off for downstream filtering
    pub fn cut_off_value(&self) -> f64 {
        self.cut_off
    }

    /// The threshold for family membership
    pub fn family_threshold(&self) -> f64 {
        self.significance_threshold
    }

    /// Whether families are built and reduced
    pub fn summarizes(&self) -> bool {
        self.summarize
    }

    /// Checks that all thresholds are probabilities in `(0, 1]`
    ///
    /// # Errors
    ///
    /// [`GoError::InvalidOption`] naming the offending value
    pub fn validate(&self) -> GoResult<()> {
        for (name, value) in [
            ("cut_off", self.cut_off),
            ("significance_threshold", self.significance_threshold),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(GoError::InvalidOption(format!(
                    "{name} must be in (0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}
