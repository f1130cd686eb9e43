//! Terms of the Gene Ontology and sets of terms
//!
//! [`TermId`] is the lightweight identifier used everywhere in this crate.
//! [`GoTerm`] is a borrowed view onto a term inside an [`crate::Ontology`]
//! that gives access to its name and its relationships. [`TermGroup`] is a
//! sorted set of `TermId`s.

mod branch;
mod goterm;
mod group;
pub(crate) mod internal;
mod termid;

pub use branch::{Branch, PerBranch};
pub use goterm::GoTerm;
pub use group::{TermGroup, TermIds};
pub use termid::TermId;
