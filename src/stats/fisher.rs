//! One-sided Fisher's exact test for the over-representation of GO terms
//!
//! The test is run per [`Branch`]. For every term that is annotated to at
//! least one study entity, the probability of observing at least as many
//! annotated study entities by chance is calculated from the
//! hypergeometric distribution of the population.

use tracing::debug;

use crate::annotations::AnnotationSet;
use crate::enrichment::RelationPolicy;
use crate::stats::hypergeom::Hypergeometric;
use crate::stats::TestResult;
use crate::term::TermGroup;
use crate::{Branch, Ontology, TermId};

/// Runs Fisher's exact tests of a study set against a population
///
/// # Examples
///
/// ```
/// use goenrichment::annotations::AnnotationSet;
/// use goenrichment::enrichment::RelationPolicy;
/// use goenrichment::ontology::Property;
/// use goenrichment::stats::FisherExactTest;
/// use goenrichment::{Branch, Ontology, TermId};
///
/// let mut builder = Ontology::builder();
/// builder.add_term(1u32, "GO:0008150", "biological_process", Branch::BiologicalProcess);
/// builder.add_term(2u32, "GO:0003674", "molecular_function", Branch::MolecularFunction);
/// builder.add_term(3u32, "GO:0005575", "cellular_component", Branch::CellularComponent);
/// builder.add_term(4u32, "GO:0009987", "cellular process", Branch::BiologicalProcess);
/// builder.add_term(5u32, "GO:0008152", "metabolic process", Branch::BiologicalProcess);
/// builder.set_root(Branch::BiologicalProcess, 1u32).unwrap();
/// builder.set_root(Branch::MolecularFunction, 2u32).unwrap();
/// builder.set_root(Branch::CellularComponent, 3u32).unwrap();
/// let mut builder = builder.terms_complete();
/// builder.add_relationship(4u32, 1u32, 1, Property::IsA).unwrap();
/// builder.add_relationship(5u32, 1u32, 1, Property::IsA).unwrap();
/// let ontology = builder.connect_all_terms().build().unwrap();
///
/// let mut annotations = AnnotationSet::new();
/// for (gene, term) in [("a", 4u32), ("b", 4), ("c", 5), ("d", 5), ("e", 5)] {
///     annotations.add(gene, term);
/// }
/// annotations.propagate(&ontology, RelationPolicy::IsAOnly);
///
/// let mut fisher = FisherExactTest::new(&ontology, &annotations);
/// let result = fisher.test(Branch::BiologicalProcess, &["a", "b"], None);
///
/// // P(X >= 2) with 2 draws from 5 entities, 2 of them annotated
/// assert_eq!(result.study_total(), 2);
/// let pvalue = result.pvalue(4u32.into()).unwrap();
/// assert!((pvalue - 0.1).abs() < 1e-12);
/// assert_eq!(result.ranked()[0], TermId::from(4u32));
/// ```
pub struct FisherExactTest<'a> {
    ontology: &'a Ontology,
    annotations: &'a AnnotationSet,
    policy: RelationPolicy,
    exclude_singletons: bool,
    hypergeom: Hypergeometric,
}

impl<'a> FisherExactTest<'a> {
    /// Constructs a new tester with the default [`RelationPolicy`]
    /// that keeps singleton terms
    pub fn new(ontology: &'a Ontology, annotations: &'a AnnotationSet) -> Self {
        Self {
            ontology,
            annotations,
            policy: RelationPolicy::default(),
            exclude_singletons: false,
            hypergeom: Hypergeometric::new(),
        }
    }

    /// Sets the [`RelationPolicy`] for the redundancy check
    #[must_use]
    pub fn relation_policy(mut self, policy: RelationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets whether terms annotated to a single study entity are discarded
    #[must_use]
    pub fn exclude_singletons(mut self, exclude: bool) -> Self {
        self.exclude_singletons = exclude;
        self
    }

    /// Tests all terms of the branch that are annotated to the study set
    ///
    /// Without a `population`, all entities of the [`AnnotationSet`] form
    /// the population. Entities without annotations are ignored.
    ///
    /// The returned [`TestResult`] is ranked, but not corrected.
    pub fn test<S: AsRef<str>>(
        &mut self,
        branch: Branch,
        study: &[S],
        population: Option<&[S]>,
    ) -> TestResult {
        let root = self.ontology.root(branch);
        let mut result = TestResult::new(branch);

        for entity in study {
            let entity = entity.as_ref();
            let Some(terms) = self.annotations.terms_of(entity) else {
                continue;
            };
            for term in terms {
                if self.ontology.branch_of(term) != Some(branch) {
                    continue;
                }
                result.increment_study_count(term);
                result.add_study_annotation(term, entity);
                if term == root {
                    result.increment_study_total();
                }
            }
        }

        if self.exclude_singletons {
            let singletons: Vec<TermId> = result
                .terms()
                .into_iter()
                .filter(|term| result.study_count(*term) == 1)
                .collect();
            debug!("Removing {} singleton terms from {}", singletons.len(), branch);
            for term in singletons {
                result.remove_term(term);
            }
        }

        let redundant: Vec<TermId> = result
            .terms()
            .into_iter()
            .filter(|term| self.is_redundant(&result, *term))
            .collect();
        debug!("Removing {} redundant terms from {}", redundant.len(), branch);
        for term in redundant {
            result.remove_term(term);
        }
        result.remove_term(root);

        self.count_population(&mut result, root, population);
        self.calculate_pvalues(&mut result);
        result.rank();
        debug!(
            "Tested {} of {} terms in {}",
            result.ranked().len(),
            result.len(),
            branch
        );
        result
    }

    /// A term is redundant if one of its direct children has the same study count
    fn is_redundant(&self, result: &TestResult, term: TermId) -> bool {
        let count = result.study_count(term);
        self.children(term)
            .iter()
            .any(|child| result.contains(child) && result.study_count(child) == count)
    }

    fn children(&self, term: TermId) -> TermGroup {
        match self.policy {
            RelationPolicy::AllRelations => self.ontology.children(term),
            RelationPolicy::IsAOnly => self.ontology.subclasses(term, true),
        }
    }

    fn count_population<S: AsRef<str>>(
        &self,
        result: &mut TestResult,
        root: TermId,
        population: Option<&[S]>,
    ) {
        match population {
            None => {
                result.set_population_total(self.annotations.count(root));
                for term in result.terms() {
                    result.set_population_count(term, self.annotations.count(term));
                }
            }
            Some(population) => {
                let mut total = 0;
                for entity in population {
                    let Some(terms) = self.annotations.terms_of(entity.as_ref()) else {
                        continue;
                    };
                    for term in terms {
                        if term == root {
                            total += 1;
                        } else if result.contains(term) {
                            result.increment_population_count(term);
                        }
                    }
                }
                result.set_population_total(total);
            }
        }
    }

    fn calculate_pvalues(&mut self, result: &mut TestResult) {
        let study_total = result.study_total();
        let population_total = result.population_total();
        if study_total == 0 || population_total == 0 {
            return;
        }
        for term in result.terms() {
            let study_count = result.study_count(term);
            let population_count = result.population_count(term);
            if population_count == 0 {
                continue;
            }
            let pvalue = self.hypergeom.upper_tail(
                study_count - 1,
                study_total,
                population_count,
                population_total,
            );
            result.set_pvalue(term, pvalue);
        }
    }
}
