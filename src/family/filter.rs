use tracing::debug;

use crate::enrichment::RelationPolicy;
use crate::family::{FamilyForest, FamilyTable};
use crate::stats::TestResult;
use crate::term::TermGroup;
use crate::Ontology;

/// Selects the representative terms of all families
///
/// Singleton families contribute their only term. All other families are
/// reduced with a [`FamilyTable`] until the table is exhausted.
pub fn representatives(
    ontology: &Ontology,
    result: &TestResult,
    forest: &FamilyForest,
    policy: RelationPolicy,
) -> TermGroup {
    let mut selected = TermGroup::new();
    for family in forest.iter() {
        if family.is_singleton() {
            selected.insert(family.term());
            continue;
        }
        let mut table = FamilyTable::new(ontology, result, policy);
        for term in family.terms() {
            table.add(term);
        }
        let members = table.len();
        let before = selected.len();
        selected.extend(table);
        debug!(
            "Reduced family of {} to {} terms",
            members,
            selected.len() - before
        );
    }
    selected
}

/// Returns a copy of the result without redundant and insignificant terms
///
/// Selected representatives are always kept. Every other term is removed
/// if it is part of a family or if its corrected p-value is unavailable or
/// not below `threshold`.
pub fn filter(
    result: &TestResult,
    forest: &FamilyForest,
    selected: &TermGroup,
    threshold: f64,
) -> TestResult {
    let members = forest.terms();
    let mut filtered = result.clone();
    for term in result.terms() {
        if selected.contains(&term) {
            continue;
        }
        let insignificant = result.corrected(term).map_or(true, |q| q >= threshold);
        if insignificant || members.contains(&term) {
            filtered.remove_term(term);
        }
    }
    debug!(
        "Filtered {} of {} terms in {}",
        filtered.len(),
        result.len(),
        result.branch()
    );
    filtered
}
