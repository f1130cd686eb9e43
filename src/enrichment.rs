//! The enrichment analysis of a study set, from Fisher's exact test to the
//! filtered set of representative terms
//!
//! An [`Enrichment`] bundles everything a run needs: the [`Ontology`], the
//! propagated [`AnnotationSet`], the study set, an optional population set
//! and the [`Options`]. [`Enrichment::run`] analyses all three branches in
//! parallel and returns an [`EnrichmentReport`].
//!
//! # Examples
//!
//! ```
//! use goenrichment::annotations::AnnotationSet;
//! use goenrichment::enrichment::{Enrichment, Options, RelationPolicy};
//! use goenrichment::ontology::Property;
//! use goenrichment::{Branch, Ontology, TermId};
//!
//! let mut builder = Ontology::builder();
//! builder.add_term(1u32, "GO:0008150", "biological_process", Branch::BiologicalProcess);
//! builder.add_term(2u32, "GO:0003674", "molecular_function", Branch::MolecularFunction);
//! builder.add_term(3u32, "GO:0005575", "cellular_component", Branch::CellularComponent);
//! builder.add_term(4u32, "GO:0009987", "cellular process", Branch::BiologicalProcess);
//! builder.add_term(5u32, "GO:0008152", "metabolic process", Branch::BiologicalProcess);
//! builder.set_root(Branch::BiologicalProcess, 1u32).unwrap();
//! builder.set_root(Branch::MolecularFunction, 2u32).unwrap();
//! builder.set_root(Branch::CellularComponent, 3u32).unwrap();
//! let mut builder = builder.terms_complete();
//! builder.add_relationship(4u32, 1u32, 1, Property::IsA).unwrap();
//! builder.add_relationship(5u32, 1u32, 1, Property::IsA).unwrap();
//! let ontology = builder.connect_all_terms().build().unwrap();
//!
//! let mut annotations = AnnotationSet::new();
//! for gene in 0..20 {
//!     let term = if gene < 5 { 4u32 } else { 5u32 };
//!     annotations.add(&format!("gene{gene}"), term);
//! }
//! annotations.propagate(&ontology, RelationPolicy::IsAOnly);
//!
//! let study = ["gene0", "gene1", "gene2", "gene3", "unknown"];
//! let enrichment = Enrichment::new(&ontology, &annotations, &study)
//!     .options(Options::default().summarize(false));
//! assert_eq!(enrichment.study().len(), 4);
//!
//! let report = enrichment.run().unwrap();
//! let result = report[Branch::BiologicalProcess].result();
//! assert_eq!(result.ranked()[0], TermId::from(4u32));
//! assert!(result.corrected(4u32.into()).unwrap() < 0.01);
//! ```

use std::collections::HashSet;
use std::ops::Index;

use tracing::{debug, info, warn};

use crate::annotations::AnnotationSet;
use crate::family::{build_families, filter, representatives, FamilyForest};
use crate::stats::{score, FisherExactTest, TestResult};
use crate::term::TermGroup;
use crate::{Branch, GoResult, Ontology, PerBranch};

mod options;

pub use options::{Options, RelationPolicy};

/// The context of one enrichment analysis
///
/// Study and population entities that are not part of the
/// [`AnnotationSet`] are dropped on construction. Synonyms are replaced by
/// their canonical entity name and every entity is kept once.
#[derive(Debug, Clone)]
pub struct Enrichment<'a> {
    ontology: &'a Ontology,
    annotations: &'a AnnotationSet,
    study: Vec<String>,
    population: Option<Vec<String>>,
    options: Options,
}

impl<'a> Enrichment<'a> {
    /// Constructs a new analysis of the study set with default [`Options`]
    pub fn new<S: AsRef<str>>(
        ontology: &'a Ontology,
        annotations: &'a AnnotationSet,
        study: &[S],
    ) -> Self {
        Self {
            ontology,
            annotations,
            study: known_entities(annotations, study, "study"),
            population: None,
            options: Options::default(),
        }
    }

    /// Sets an explicit population set
    ///
    /// Without a population, all annotated entities form the population.
    #[must_use]
    pub fn population<S: AsRef<str>>(mut self, population: &[S]) -> Self {
        self.population = Some(known_entities(self.annotations, population, "population"));
        self
    }

    /// Sets the [`Options`]
    #[must_use]
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// The annotated study entities
    pub fn study(&self) -> &[String] {
        &self.study
    }

    /// The annotated population entities, if a population was set
    pub fn population_set(&self) -> Option<&[String]> {
        self.population.as_deref()
    }

    /// The [`Options`] of the run
    pub fn run_options(&self) -> &Options {
        &self.options
    }

    /// Analyses all three branches in parallel
    ///
    /// # Errors
    ///
    /// [`crate::GoError::InvalidOption`] if the options are invalid
    pub fn run(&self) -> GoResult<EnrichmentReport> {
        self.options.validate()?;
        info!(
            "Running enrichment of {} study entities with {}",
            self.study.len(),
            self.options.correction_procedure()
        );
        let (mf, (bp, cc)) = rayon::join(
            || self.run_branch(Branch::MolecularFunction),
            || {
                rayon::join(
                    || self.run_branch(Branch::BiologicalProcess),
                    || self.run_branch(Branch::CellularComponent),
                )
            },
        );
        Ok(EnrichmentReport {
            branches: PerBranch::from([mf, bp, cc]),
            options: self.options,
        })
    }

    /// Analyses a single branch
    ///
    /// The options are not validated.
    pub fn run_branch(&self, branch: Branch) -> BranchReport {
        let options = &self.options;
        let mut fisher = FisherExactTest::new(self.ontology, self.annotations)
            .relation_policy(options.policy())
            .exclude_singletons(options.excludes_singletons());
        let mut result = fisher.test(branch, self.study.as_slice(), self.population.as_deref());
        result.apply_correction(options.correction_procedure());

        for term in result.ranked().to_vec() {
            let term_score = result.corrected(term).and_then(|corrected| {
                score(
                    self.ontology.information_content(term),
                    result.study_count(term),
                    result.study_total(),
                    corrected,
                )
            });
            if let Some(term_score) = term_score {
                result.set_score(term, term_score);
            }
        }
        info!(
            "{}: {} terms tested, {} significant",
            branch,
            result.ranked().len(),
            result.significant(options.cut_off_value()).len()
        );

        if !options.summarizes() {
            return BranchReport {
                result,
                families: FamilyForest::new(),
                representatives: TermGroup::new(),
                filtered: None,
            };
        }

        let threshold = options.family_threshold();
        let families = build_families(self.ontology, &result, threshold);
        let selected = representatives(self.ontology, &result, &families, options.policy());
        let filtered = filter(&result, &families, &selected, threshold);
        info!(
            "{}: {} families, {} terms after filtering",
            branch,
            families.len(),
            filtered.len()
        );
        BranchReport {
            result,
            families,
            representatives: selected,
            filtered: Some(filtered),
        }
    }
}

fn known_entities<S: AsRef<str>>(
    annotations: &AnnotationSet,
    entities: &[S],
    kind: &str,
) -> Vec<String> {
    let mut seen = HashSet::with_capacity(entities.len());
    let mut known = Vec::with_capacity(entities.len());
    let mut missing = 0;
    for entity in entities {
        let entity = entity.as_ref();
        match annotations.resolve(entity) {
            None => {
                debug!("No annotations for {} entity {}", kind, entity);
                missing += 1;
            }
            Some(canonical) => {
                if seen.insert(canonical) {
                    known.push(canonical.to_string());
                }
            }
        }
    }
    if missing > 0 {
        warn!(
            "{} of {} {} entities have no annotations",
            missing,
            entities.len(),
            kind
        );
    }
    known
}

/// The results of one branch
#[derive(Debug, Clone)]
pub struct BranchReport {
    result: TestResult,
    families: FamilyForest,
    representatives: TermGroup,
    filtered: Option<TestResult>,
}

impl BranchReport {
    /// The corrected and scored statistics of all tested terms
    pub fn result(&self) -> &TestResult {
        &self.result
    }

    /// The families of significant terms
    ///
    /// Empty if the run did not summarize.
    pub fn families(&self) -> &FamilyForest {
        &self.families
    }

    /// The representative terms selected from the families
    pub fn representatives(&self) -> &TermGroup {
        &self.representatives
    }

    /// The result without redundant and insignificant terms
    ///
    /// `None` if the run did not summarize.
    pub fn filtered(&self) -> Option<&TestResult> {
        self.filtered.as_ref()
    }
}

/// The results of all three branches
///
/// Indexing by [`Branch`] returns the [`BranchReport`] of that branch.
#[derive(Debug, Clone)]
pub struct EnrichmentReport {
    branches: PerBranch<BranchReport>,
    options: Options,
}

impl EnrichmentReport {
    /// Iterates all branches and their reports
    pub fn iter(&self) -> impl Iterator<Item = (Branch, &BranchReport)> {
        self.branches.iter()
    }

    /// Returns the significant terms of a branch, based on the cut-off
    ///
    /// Uses the filtered result if present, the full result otherwise.
    pub fn significant(&self, branch: Branch) -> TermGroup {
        let report = &self.branches[branch];
        report
            .filtered()
            .unwrap_or(report.result())
            .significant(self.options.cut_off_value())
    }

    /// The [`Options`] of the run
    pub fn options(&self) -> &Options {
        &self.options
    }
}

impl Index<Branch> for EnrichmentReport {
    type Output = BranchReport;

    fn index(&self, branch: Branch) -> &BranchReport {
        &self.branches[branch]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::stats::Correction;
    use crate::{fixture, GoError, TermId};

    fn id(n: u32) -> TermId {
        TermId::from(n)
    }

    fn ids(terms: &[u32]) -> TermGroup {
        terms.iter().map(|t| TermId::from(*t)).collect()
    }

    /// Study entities enriched in A (30), B (31), C (32), D (33) and E (40)
    /// with a background of 100 entities in metabolic process (11)
    fn annotations(ontology: &Ontology) -> (AnnotationSet, Vec<String>) {
        let mut annotations = AnnotationSet::new();
        let mut study = Vec::new();
        for (count, term) in [(3, 33u32), (2, 31), (3, 32), (4, 40)] {
            for _ in 0..count {
                let entity = format!("s{}", study.len());
                annotations.add(&entity, term);
                study.push(entity);
            }
        }
        for i in 0..100 {
            annotations.add(&format!("b{i}"), 11u32);
        }
        annotations.propagate(ontology, RelationPolicy::IsAOnly);
        (annotations, study)
    }

    #[test]
    fn families_are_reduced() {
        let ontology = fixture::ontology();
        let (annotations, study) = annotations(&ontology);
        let report = Enrichment::new(&ontology, &annotations, &study)
            .run()
            .unwrap();
        let bp = &report[Branch::BiologicalProcess];

        let result = bp.result();
        assert_eq!(result.study_total(), 12);
        assert_eq!(result.population_total(), 112);
        assert_eq!(
            result.ranked(),
            &[id(30), id(31), id(40), id(32), id(33)]
        );
        assert!(result.corrected(id(33)).unwrap() < 0.01);
        assert!(result.score(id(30)).unwrap() > result.score(id(31)).unwrap());

        let families: Vec<TermGroup> = bp.families().iter().map(|f| f.terms()).collect();
        assert_eq!(families, vec![ids(&[30, 31, 32, 33]), ids(&[40])]);
        assert_eq!(bp.representatives(), &ids(&[30, 40]));

        let filtered = bp.filtered().unwrap();
        assert_eq!(filtered.terms(), vec![id(30), id(40)]);
        assert_eq!(report.significant(Branch::BiologicalProcess), ids(&[30, 40]));

        assert!(report[Branch::MolecularFunction].result().is_empty());
        assert!(report[Branch::CellularComponent].families().is_empty());
    }

    #[test]
    fn unknown_entities_are_dropped() {
        let ontology = fixture::ontology();
        let (annotations, _) = annotations(&ontology);
        let enrichment = Enrichment::new(&ontology, &annotations, &["s0", "s0", "missing", "s1"])
            .population(&["s0", "b1", "nope"]);
        assert_eq!(enrichment.study(), &["s0".to_string(), "s1".to_string()]);
        assert_eq!(
            enrichment.population_set(),
            Some(&["s0".to_string(), "b1".to_string()][..])
        );
    }

    #[test]
    fn synonyms_are_counted_once() {
        let ontology = fixture::ontology();
        let (mut annotations, _) = annotations(&ontology);
        annotations.add_synonym("alias", "s0");
        annotations.add_synonym("dangling", "missing");

        let enrichment = Enrichment::new(
            &ontology,
            &annotations,
            &["alias", "s0", "dangling", "s1"],
        );
        assert_eq!(enrichment.study(), &["s0".to_string(), "s1".to_string()]);
    }

    #[test]
    fn without_summary() {
        let ontology = fixture::ontology();
        let (annotations, study) = annotations(&ontology);
        let report = Enrichment::new(&ontology, &annotations, &study)
            .options(
                Options::default()
                    .summarize(false)
                    .correction(Correction::Bonferroni),
            )
            .run()
            .unwrap();
        let bp = &report[Branch::BiologicalProcess];
        assert!(bp.filtered().is_none());
        assert!(bp.families().is_empty());
        assert_eq!(report.significant(Branch::BiologicalProcess).len(), 5);
        assert_eq!(report.options().correction_procedure(), Correction::Bonferroni);
    }

    #[test]
    fn invalid_options() {
        let ontology = fixture::ontology();
        let (annotations, study) = annotations(&ontology);
        let result = Enrichment::new(&ontology, &annotations, &study)
            .options(Options::default().cut_off(2.0))
            .run();
        assert!(matches!(result, Err(GoError::InvalidOption(_))));
    }
}
