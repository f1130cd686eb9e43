use std::collections::BTreeMap;

use crate::enrichment::RelationPolicy;
use crate::stats::{score, TestResult};
use crate::term::TermGroup;
use crate::{f64_from_usize, Ontology, TermId, DEFAULT_NUM_PARENTS};

/// Greedy selection of representative terms within a family
///
/// The table is a symmetric adjacency relation between the terms of a
/// family: two terms are neighbours if one is an ancestor of the other.
/// Every term is its own neighbour as well. Each term carries a score,
/// see [`crate::stats::score`].
///
/// Every call of `next` selects the term with the highest
/// score weighted by the relative size of its neighbourhood, then contracts
/// the neighbourhood: terms whose neighbours are all covered by the selected
/// term are dropped, all other neighbours lose their connections into that
/// neighbourhood. The table shrinks with every call until it is empty.
///
/// # Examples
///
/// ```
/// use goenrichment::enrichment::RelationPolicy;
/// use goenrichment::family::FamilyTable;
/// use goenrichment::ontology::Property;
/// use goenrichment::stats::TestResult;
/// use goenrichment::{Branch, Ontology};
///
/// let mut builder = Ontology::builder();
/// builder.add_term(1u32, "GO:0008150", "biological_process", Branch::BiologicalProcess);
/// builder.add_term(2u32, "GO:0003674", "molecular_function", Branch::MolecularFunction);
/// builder.add_term(3u32, "GO:0005575", "cellular_component", Branch::CellularComponent);
/// builder.add_term(4u32, "GO:0009987", "cellular process", Branch::BiologicalProcess);
/// builder.add_term(5u32, "GO:0007049", "cell cycle", Branch::BiologicalProcess);
/// builder.set_root(Branch::BiologicalProcess, 1u32).unwrap();
/// builder.set_root(Branch::MolecularFunction, 2u32).unwrap();
/// builder.set_root(Branch::CellularComponent, 3u32).unwrap();
/// let mut builder = builder.terms_complete();
/// builder.add_relationship(4u32, 1u32, 1, Property::IsA).unwrap();
/// builder.add_relationship(5u32, 4u32, 1, Property::IsA).unwrap();
/// let ontology = builder.connect_all_terms().build().unwrap();
///
/// let result = TestResult::new(Branch::BiologicalProcess);
/// let mut table = FamilyTable::new(&ontology, &result, RelationPolicy::IsAOnly);
/// table.add_with_score(4u32.into(), 1.0);
/// table.add_with_score(5u32.into(), 2.0);
/// assert_eq!(table.edge_count(), 4);
///
/// // 5 covers 4, so 4 is dropped
/// assert_eq!(table.next(), Some(5u32.into()));
/// assert!(table.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct FamilyTable<'a> {
    ontology: &'a Ontology,
    result: &'a TestResult,
    policy: RelationPolicy,
    neighbours: BTreeMap<TermId, TermGroup>,
    scores: BTreeMap<TermId, f64>,
}

impl<'a> FamilyTable<'a> {
    /// Constructs an empty table for terms of the [`TestResult`]
    pub fn new(ontology: &'a Ontology, result: &'a TestResult, policy: RelationPolicy) -> Self {
        Self {
            ontology,
            result,
            policy,
            neighbours: BTreeMap::new(),
            scores: BTreeMap::new(),
        }
    }

    /// Adds the term and connects it to all related terms in the table
    ///
    /// The score is calculated from the information content and the
    /// statistics of the term. Terms without a corrected p-value score `0`.
    pub fn add(&mut self, term: TermId) {
        let score = self
            .result
            .corrected(term)
            .and_then(|corrected| {
                score(
                    self.ontology.information_content(term),
                    self.result.study_count(term),
                    self.result.study_total(),
                    corrected,
                )
            })
            .unwrap_or_default();
        self.add_with_score(term, score);
    }

    /// Adds the term with a precomputed score
    ///
    /// Adding a term a second time has no effect.
    pub fn add_with_score(&mut self, term: TermId, score: f64) {
        if self.scores.contains_key(&term) {
            return;
        }
        let ontology = self.ontology;
        let policy = self.policy;
        let mut group = TermGroup::with_capacity(DEFAULT_NUM_PARENTS);
        group.insert(term);
        for (other, neighbours) in &mut self.neighbours {
            if related(ontology, policy, term, *other) {
                neighbours.insert(term);
                group.insert(*other);
            }
        }
        self.neighbours.insert(term, group);
        self.scores.insert(term, score);
    }

    /// The number of terms in the table
    pub fn len(&self) -> usize {
        self.neighbours.len()
    }

    /// Returns `true` if no term is left
    pub fn is_empty(&self) -> bool {
        self.neighbours.is_empty()
    }

    /// The number of directed edges, including self-loops
    pub fn edge_count(&self) -> usize {
        self.neighbours.values().map(TermGroup::len).sum()
    }

    /// Returns `true` if the term is still in the table
    pub fn contains(&self, term: TermId) -> bool {
        self.neighbours.contains_key(&term)
    }

    /// The current neighbours of the term
    pub fn neighbours(&self, term: TermId) -> Option<&TermGroup> {
        self.neighbours.get(&term)
    }

    /// The score of the term
    pub fn score(&self, term: TermId) -> Option<f64> {
        self.scores.get(&term).copied()
    }

    fn best(&self) -> Option<TermId> {
        let keys = f64_from_usize(self.neighbours.len());
        let mut best: Option<(TermId, f64)> = None;
        for (term, neighbours) in &self.neighbours {
            let score = self.scores.get(term).copied().unwrap_or_default();
            let weighted = score * f64_from_usize(neighbours.len()) / keys;
            if best.map_or(true, |(_, max)| weighted > max) {
                best = Some((*term, weighted));
            }
        }
        best.map(|(term, _)| term)
    }

    fn remove(&mut self, term: TermId) {
        self.neighbours.remove(&term);
        self.scores.remove(&term);
    }

    /// Removes the terms and, transitively, every term left without neighbours
    fn collect_garbage(&mut self, mut orphans: Vec<TermId>) {
        while !orphans.is_empty() {
            let mut next = Vec::new();
            for orphan in orphans {
                self.remove(orphan);
                for (k, neighbours) in &mut self.neighbours {
                    if neighbours.remove(&orphan) && neighbours.is_empty() {
                        next.push(*k);
                    }
                }
            }
            orphans = next;
        }
    }
}

impl Iterator for FamilyTable<'_> {
    type Item = TermId;

    /// Selects the next representative term and contracts its neighbourhood
    ///
    /// Of terms with equal weighted scores, the lowest [`TermId`] wins.
    /// Returns `None` once the table is empty.
    fn next(&mut self) -> Option<TermId> {
        let best = self.best()?;
        let neighbourhood = self.neighbours.get(&best).cloned().unwrap_or_default();

        for i in &neighbourhood {
            let Some(own) = self.neighbours.get(&i) else {
                continue;
            };
            if own.is_subset(&neighbourhood) {
                self.remove(i);
            } else if let Some(own) = self.neighbours.get_mut(&i) {
                own.remove(&best);
                for j in &neighbourhood {
                    own.remove(&j);
                }
            }

            let mut orphans = Vec::new();
            for (j, neighbours) in &mut self.neighbours {
                if neighbours.remove(&i) && neighbours.is_empty() {
                    orphans.push(*j);
                }
            }
            self.collect_garbage(orphans);
        }

        self.remove(best);
        Some(best)
    }
}

fn related(ontology: &Ontology, policy: RelationPolicy, a: TermId, b: TermId) -> bool {
    match policy {
        RelationPolicy::AllRelations => {
            ontology.contains_relationship(a, b) || ontology.contains_relationship(b, a)
        }
        RelationPolicy::IsAOnly => {
            ontology.contains_subclass(a, b) || ontology.contains_subclass(b, a)
        }
    }
}
