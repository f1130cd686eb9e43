use tracing::debug;

use crate::family::FamilyForest;
use crate::ontology::Property;
use crate::stats::TestResult;
use crate::term::TermGroup;
use crate::{Ontology, TermId};

/// The is-a distance from the branch root to the first family candidates
const CANDIDATE_DEPTH: u32 = 3;

/// Groups the significant terms of a [`TestResult`] into families
///
/// The search starts at the `is_a` descendants three levels below the
/// branch root and walks down the direct `is_a` children. A term with a
/// corrected p-value below `threshold` starts a new family, unless it is
/// already part of one, and all significant descendants below it join
/// that family. Terms that are not significant hand the search on to
/// their children, which can then start families of their own.
///
/// Terms that are missing from the result, e.g. because they were
/// discarded as redundant, end the search along that path.
///
/// Families that are fully contained in another family are discarded.
pub fn build_families(ontology: &Ontology, result: &TestResult, threshold: f64) -> FamilyForest {
    let root = ontology.root(result.branch());
    let mut forest = FamilyForest::new();
    let mut members = TermGroup::new();
    for candidate in ontology.descendants(root, Some(CANDIDATE_DEPTH), Some(Property::IsA)) {
        grow(
            ontology,
            result,
            threshold,
            candidate,
            None,
            &mut forest,
            &mut members,
        );
    }
    let subsumed = forest.remove_subsumed();
    debug!(
        "Built {} families in {}, {} subsumed",
        forest.len(),
        result.branch(),
        subsumed
    );
    forest
}

fn grow(
    ontology: &Ontology,
    result: &TestResult,
    threshold: f64,
    term: TermId,
    parent: Option<usize>,
    forest: &mut FamilyForest,
    members: &mut TermGroup,
) {
    if !result.contains(term) {
        return;
    }
    let significant = result.corrected(term).map_or(false, |q| q < threshold);
    if !significant {
        for child in ontology.subclasses(term, true) {
            grow(ontology, result, threshold, child, None, forest, members);
        }
        return;
    }
    let node = match parent {
        Some(parent) => forest.add_child(parent, term),
        None if members.contains(&term) => return,
        None => forest.add_root(term),
    };
    members.insert(term);
    for child in ontology.subclasses(term, true) {
        grow(ontology, result, threshold, child, Some(node), forest, members);
    }
}
