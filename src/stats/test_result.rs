use std::collections::{BTreeSet, HashMap};

use crate::stats::Correction;
use crate::term::TermGroup;
use crate::{f64_from_usize, Branch, TermId};

/// The enrichment statistics of all tested terms of one [`Branch`]
///
/// Per term it holds the study and population counts, the raw and
/// corrected p-values, the score and the study entities annotated to the
/// term. Terms with a p-value are ranked in ascending order of their
/// p-value; terms whose p-value is unavailable are kept, but not ranked
/// and not corrected.
///
/// Removing a term deletes all of its data at once.
#[derive(Debug, Clone, PartialEq)]
pub struct TestResult {
    branch: Branch,
    study_total: usize,
    population_total: usize,
    study_counts: HashMap<TermId, usize>,
    population_counts: HashMap<TermId, usize>,
    pvalues: HashMap<TermId, f64>,
    corrected: HashMap<TermId, f64>,
    scores: HashMap<TermId, f64>,
    study_annotations: HashMap<TermId, BTreeSet<String>>,
    ranked: Vec<TermId>,
    min_corrected: Option<f64>,
}

impl TestResult {
    /// Constructs an empty `TestResult` for the branch
    pub fn new(branch: Branch) -> Self {
        Self {
            branch,
            study_total: 0,
            population_total: 0,
            study_counts: HashMap::new(),
            population_counts: HashMap::new(),
            pvalues: HashMap::new(),
            corrected: HashMap::new(),
            scores: HashMap::new(),
            study_annotations: HashMap::new(),
            ranked: Vec::new(),
            min_corrected: None,
        }
    }

    /// The branch of all terms in the result
    pub fn branch(&self) -> Branch {
        self.branch
    }

    /// Returns the number of terms in the result
    pub fn len(&self) -> usize {
        self.study_counts.len()
    }

    /// Returns `true` if the result does not contain any term
    pub fn is_empty(&self) -> bool {
        self.study_counts.is_empty()
    }

    /// Returns `true` if the term is part of the result
    pub fn contains(&self, term: TermId) -> bool {
        self.study_counts.contains_key(&term)
    }

    /// The number of study entities annotated to the branch root
    pub fn study_total(&self) -> usize {
        self.study_total
    }

    /// The number of population entities annotated to the branch root
    pub fn population_total(&self) -> usize {
        self.population_total
    }

    /// The number of study entities annotated to the term, `0` if unknown
    pub fn study_count(&self, term: TermId) -> usize {
        self.study_counts.get(&term).copied().unwrap_or_default()
    }

    /// The number of population entities annotated to the term, `0` if unknown
    pub fn population_count(&self, term: TermId) -> usize {
        self.population_counts.get(&term).copied().unwrap_or_default()
    }

    /// The fraction of study entities that are annotated to the term
    pub fn study_fraction(&self, term: TermId) -> Option<f64> {
        fraction(self.study_count(term), self.study_total)
    }

    /// The fraction of population entities that are annotated to the term
    pub fn population_fraction(&self, term: TermId) -> Option<f64> {
        fraction(self.population_count(term), self.population_total)
    }

    /// The raw p-value of the term
    pub fn pvalue(&self, term: TermId) -> Option<f64> {
        self.pvalues.get(&term).copied()
    }

    /// The corrected p-value (or q-value) of the term
    pub fn corrected(&self, term: TermId) -> Option<f64> {
        self.corrected.get(&term).copied()
    }

    /// The score of the term, see [`crate::stats::score`]
    pub fn score(&self, term: TermId) -> Option<f64> {
        self.scores.get(&term).copied()
    }

    /// The smallest corrected p-value of all terms
    ///
    /// The value is not updated when terms are removed.
    pub fn min_corrected(&self) -> Option<f64> {
        self.min_corrected
    }

    /// The study entities that are annotated to the term
    pub fn study_annotations(&self, term: TermId) -> Option<&BTreeSet<String>> {
        self.study_annotations.get(&term)
    }

    /// Returns the edge weight used by graph renderers
    ///
    /// `16` for corrected values up to `0.05`, `8` up to `0.1` and `4` otherwise
    pub fn weight(&self, term: TermId) -> u8 {
        match self.corrected(term) {
            Some(q) if q <= 0.05 => 16,
            Some(q) if q <= 0.1 => 8,
            _ => 4,
        }
    }

    /// Returns all terms: ranked terms by ascending p-value,
    /// followed by all unranked terms by ascending id
    pub fn terms(&self) -> Vec<TermId> {
        let mut unranked: Vec<TermId> = self
            .study_counts
            .keys()
            .filter(|term| !self.pvalues.contains_key(term))
            .copied()
            .collect();
        unranked.sort_unstable();
        let mut terms = self.ranked.clone();
        terms.extend(unranked);
        terms
    }

    /// Returns the ranked terms, by ascending p-value
    pub fn ranked(&self) -> &[TermId] {
        &self.ranked
    }

    /// Returns all ranked terms with a corrected p-value below `cut_off`
    pub fn significant(&self, cut_off: f64) -> TermGroup {
        self.ranked
            .iter()
            .filter(|term| self.corrected(**term).map_or(false, |q| q < cut_off))
            .copied()
            .collect()
    }

    /// Iterates all terms and their statistics, in the order of [`TestResult::terms`]
    pub fn rows(&self) -> impl Iterator<Item = ResultRow<'_>> {
        self.terms().into_iter().map(move |term| ResultRow {
            term,
            study_count: self.study_count(term),
            population_count: self.population_count(term),
            study_fraction: self.study_fraction(term),
            population_fraction: self.population_fraction(term),
            pvalue: self.pvalue(term),
            corrected: self.corrected(term),
            score: self.score(term),
            entities: self
                .study_annotations(term)
                .map(|entities| entities.iter().map(String::as_str).collect())
                .unwrap_or_default(),
        })
    }

    pub(crate) fn increment_study_count(&mut self, term: TermId) {
        *self.study_counts.entry(term).or_default() += 1;
    }

    pub(crate) fn add_study_annotation(&mut self, term: TermId, entity: &str) {
        self.study_annotations
            .entry(term)
            .or_default()
            .insert(entity.to_string());
    }

    pub(crate) fn increment_study_total(&mut self) {
        self.study_total += 1;
    }

    pub(crate) fn increment_population_count(&mut self, term: TermId) {
        *self.population_counts.entry(term).or_default() += 1;
    }

    pub(crate) fn set_population_count(&mut self, term: TermId, count: usize) {
        self.population_counts.insert(term, count);
    }

    pub(crate) fn set_population_total(&mut self, total: usize) {
        self.population_total = total;
    }

    pub(crate) fn set_pvalue(&mut self, term: TermId, pvalue: f64) {
        self.pvalues.insert(term, pvalue);
    }

    pub(crate) fn set_score(&mut self, term: TermId, score: f64) {
        self.scores.insert(term, score);
    }

    pub(crate) fn set_corrected(&mut self, term: TermId, corrected: f64) {
        self.corrected.insert(term, corrected);
        if self.min_corrected.map_or(true, |min| corrected < min) {
            self.min_corrected = Some(corrected);
        }
    }

    /// Ranks all terms with a p-value in ascending order
    ///
    /// Terms with equal p-values keep the order of their ids.
    pub(crate) fn rank(&mut self) {
        let mut ranked: Vec<TermId> = self.pvalues.keys().copied().collect();
        ranked.sort_unstable();
        ranked.sort_by(|a, b| self.pvalues[a].total_cmp(&self.pvalues[b]));
        self.ranked = ranked;
    }

    /// Applies the multiple test correction to all ranked terms
    pub(crate) fn apply_correction(&mut self, correction: Correction) {
        let pvalues: Vec<f64> = self.ranked.iter().map(|term| self.pvalues[term]).collect();
        let corrected = correction.correct(&pvalues);
        let ranked = self.ranked.clone();
        for (term, q) in ranked.into_iter().zip(corrected) {
            self.set_corrected(term, q);
        }
    }

    /// Removes the term and all of its statistics
    pub fn remove_term(&mut self, term: TermId) {
        self.study_counts.remove(&term);
        self.population_counts.remove(&term);
        self.study_annotations.remove(&term);
        self.scores.remove(&term);
        self.corrected.remove(&term);
        if self.pvalues.remove(&term).is_some() {
            self.ranked.retain(|ranked| *ranked != term);
        }
    }
}

fn fraction(count: usize, total: usize) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(f64_from_usize(count) / f64_from_usize(total))
    }
}

/// The statistics of one term of a [`TestResult`]
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow<'a> {
    /// The tested term
    pub term: TermId,
    /// Number of study entities annotated to the term
    pub study_count: usize,
    /// Number of population entities annotated to the term
    pub population_count: usize,
    /// `study_count / study_total`
    pub study_fraction: Option<f64>,
    /// `population_count / population_total`
    pub population_fraction: Option<f64>,
    /// The raw p-value
    pub pvalue: Option<f64>,
    /// The corrected p-value or q-value
    pub corrected: Option<f64>,
    /// The score, see [`crate::stats::score`]
    pub score: Option<f64>,
    /// The study entities annotated to the term, sorted
    pub entities: Vec<&'a str>,
}
