//! Gene Ontology term enrichment with family-based redundancy filtering
//!
//! `goenrichment` tests which terms of the [Gene Ontology](http://geneontology.org)
//! are over-represented in a study set of entities, for example the genes
//! that are differentially expressed in an experiment, compared to a
//! population. The raw p-values of Fisher's exact tests are corrected for
//! multiple testing. Significant terms are then grouped into families of
//! related terms and each family is reduced to a few representative terms.
//!
//! The main building blocks are:
//!
//! - [`Ontology`]: the terms of the three [`Branch`]es and the transitive
//!   closure of their relationships, constructed with an
//!   [`ontology::Builder`]
//! - [`annotations::AnnotationSet`]: the GO terms of every entity,
//!   propagated along the ontology
//! - [`stats`]: the hypergeometric distribution, Fisher's exact test and
//!   multiple test corrections
//! - [`family`]: family construction and greedy reduction
//! - [`Enrichment`]: runs the complete analysis for all branches
//!
//! The crate logs through [`tracing`], without installing a subscriber.
#![warn(missing_docs)]

use std::num::ParseIntError;
use thiserror::Error;

pub mod annotations;
pub mod enrichment;
pub mod family;
pub mod ontology;
pub mod stats;
pub mod term;

#[cfg(test)]
mod fixture;

pub use enrichment::{Enrichment, EnrichmentReport, Options};
pub use ontology::Ontology;
pub use term::{Branch, GoTerm, PerBranch, TermGroup, TermId};

const DEFAULT_NUM_PARENTS: usize = 4;
const DEFAULT_NUM_ANNOTATIONS: usize = 16;

/// Corrected p-value below which a term is considered significant when
/// building term families
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.01;

/// Default corrected p-value (or q-value) cut-off for downstream filtering
pub const DEFAULT_CUT_OFF: f64 = 0.01;

/// Error type of the `goenrichment` crate
#[derive(Error, Debug, PartialEq)]
pub enum GoError {
    /// The requested term does not exist in the ontology
    #[error("term does not exist")]
    DoesNotExist,
    /// An integer could not be parsed
    #[error("unable to parse Integer")]
    ParseIntError,
    /// A term identifier is not in the `GO:0000000` format
    #[error("invalid term identifier: {0}")]
    InvalidTermId(String),
    /// A branch name could not be matched to one of the three GO branches
    #[error("unknown ontology branch: {0}")]
    UnknownBranch(String),
    /// A multiple test correction name could not be parsed
    #[error("unknown multiple test correction: {0}")]
    UnknownCorrection(String),
    /// A relationship uses an object property that was never declared
    #[error("unknown object property: {0}")]
    UnknownProperty(u32),
    /// A raw relationship fact violates the loader contract
    #[error("invalid relationship: {0}")]
    InvalidRelationship(String),
    /// A branch has no root term
    #[error("no root term defined for {0}")]
    MissingRoot(Branch),
    /// A branch has more than one root term
    #[error("more than one root term defined for {0}")]
    DuplicateRoot(Branch),
    /// A configuration value is out of range
    #[error("invalid option: {0}")]
    InvalidOption(String),
}

impl From<ParseIntError> for GoError {
    fn from(_: ParseIntError) -> Self {
        GoError::ParseIntError
    }
}

/// Shortcut for `Result<T, GoError>`
pub type GoResult<T> = Result<T, GoError>;

/// Converts counts to `f64` for divisions
///
/// All counts in this crate are bounded by the number of annotated entities,
/// which is far below the 2^52 limit of exact float representation
#[allow(clippy::cast_precision_loss)]
pub(crate) fn f64_from_usize(n: usize) -> f64 {
    n as f64
}
