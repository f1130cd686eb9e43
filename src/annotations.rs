//! Annotations of biological entities (e.g. gene products) to GO terms
//!
//! An [`AnnotationSet`] is an indexed table in both directions: every
//! entity maps to its [`TermGroup`] and every term to the entities annotated
//! to it. Before it is used for enrichment, the set must be propagated along
//! the ontology closure, so that an entity annotated to a term is also
//! annotated to all of the term's ancestors.
//!
//! # Examples
//!
//! ```
//! use goenrichment::annotations::AnnotationSet;
//! use goenrichment::enrichment::RelationPolicy;
//! use goenrichment::ontology::Property;
//! use goenrichment::{Branch, Ontology};
//!
//! let mut builder = Ontology::builder();
//! builder.add_term(1u32, "GO:0008150", "biological_process", Branch::BiologicalProcess);
//! builder.add_term(2u32, "GO:0003674", "molecular_function", Branch::MolecularFunction);
//! builder.add_term(3u32, "GO:0005575", "cellular_component", Branch::CellularComponent);
//! builder.add_term(4u32, "GO:0009987", "cellular process", Branch::BiologicalProcess);
//! builder.set_root(Branch::BiologicalProcess, 1u32).unwrap();
//! builder.set_root(Branch::MolecularFunction, 2u32).unwrap();
//! builder.set_root(Branch::CellularComponent, 3u32).unwrap();
//! let mut builder = builder.terms_complete();
//! builder.add_relationship(4u32, 1u32, 1, Property::IsA).unwrap();
//! let ontology = builder.connect_all_terms().build().unwrap();
//!
//! let mut annotations = AnnotationSet::new();
//! annotations.add("BRCA2", 4u32);
//! annotations.add_synonym("FANCD1", "BRCA2");
//! annotations.propagate(&ontology, RelationPolicy::IsAOnly);
//!
//! assert!(annotations.contains("FANCD1"));
//! assert_eq!(annotations.count(1u32.into()), 1);
//! assert!(annotations.is_annotated("FANCD1", 1u32.into()));
//! ```

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::enrichment::RelationPolicy;
use crate::term::TermGroup;
use crate::{f64_from_usize, Ontology, TermId, DEFAULT_NUM_ANNOTATIONS};

/// Bidirectional table of entity to term annotations
#[derive(Debug, Clone, Default)]
pub struct AnnotationSet {
    entity_terms: HashMap<String, TermGroup>,
    term_entities: HashMap<TermId, BTreeSet<String>>,
    synonyms: HashMap<String, String>,
}

impl AnnotationSet {
    /// Constructs an empty `AnnotationSet`
    pub fn new() -> Self {
        Self::default()
    }

    /// Annotates `entity` to `term`
    ///
    /// Returns `false` if the annotation was already present
    pub fn add<I: Into<TermId>>(&mut self, entity: &str, term: I) -> bool {
        let term = term.into();
        let added = self
            .entity_terms
            .entry(entity.to_string())
            .or_insert_with(|| TermGroup::with_capacity(DEFAULT_NUM_ANNOTATIONS))
            .insert(term);
        if added {
            self.term_entities
                .entry(term)
                .or_default()
                .insert(entity.to_string());
        }
        added
    }

    /// Registers `synonym` as an alternative name of `entity`
    pub fn add_synonym(&mut self, synonym: &str, entity: &str) {
        self.synonyms.insert(synonym.to_string(), entity.to_string());
    }

    /// Resolves a synonym to the annotated entity name
    ///
    /// Names that are annotated directly are returned unchanged.
    pub fn resolve<'a>(&'a self, entity: &'a str) -> Option<&'a str> {
        if self.entity_terms.contains_key(entity) {
            return Some(entity);
        }
        self.synonyms
            .get(entity)
            .filter(|canonical| self.entity_terms.contains_key(canonical.as_str()))
            .map(String::as_str)
    }

    /// Returns `true` if the entity, or its synonym, has annotations
    pub fn contains(&self, entity: &str) -> bool {
        self.resolve(entity).is_some()
    }

    /// Returns `true` if the entity, or its synonym, is annotated to `term`
    pub fn is_annotated(&self, entity: &str, term: TermId) -> bool {
        self.terms_of(entity)
            .map_or(false, |terms| terms.contains(&term))
    }

    /// Returns the terms annotated to the entity, resolving synonyms
    pub fn terms_of(&self, entity: &str) -> Option<&TermGroup> {
        self.resolve(entity)
            .and_then(|entity| self.entity_terms.get(entity))
    }

    /// Returns the entities annotated to `term`
    pub fn entities_of(&self, term: TermId) -> Option<&BTreeSet<String>> {
        self.term_entities.get(&term)
    }

    /// Returns the number of entities annotated to `term`
    pub fn count(&self, term: TermId) -> usize {
        self.term_entities.get(&term).map_or(0, BTreeSet::len)
    }

    /// Returns the number of entities annotated to both terms
    pub fn count_shared(&self, a: TermId, b: TermId) -> usize {
        match (self.term_entities.get(&a), self.term_entities.get(&b)) {
            (Some(a), Some(b)) => a.intersection(b).count(),
            _ => 0,
        }
    }

    /// Returns the phi coefficient of the annotations of two terms
    ///
    /// This is Pearson's correlation of the two binary variables
    /// "entity is annotated to the term" over all annotated entities.
    /// Returns `None` if one of the terms is annotated to either no
    /// entity or to all entities.
    pub fn correlation(&self, a: TermId, b: TermId) -> Option<f64> {
        let total = f64_from_usize(self.len());
        let n1_ = f64_from_usize(self.count(a));
        let n_1 = f64_from_usize(self.count(b));
        let n11 = f64_from_usize(self.count_shared(a, b));
        let n0_ = total - n1_;
        let n_0 = total - n_1;
        let n10 = n1_ - n11;
        let n01 = n_1 - n11;
        let n00 = total - (n1_ + n_1 - n11);

        let denominator = (n1_ * n0_ * n_1 * n_0).sqrt();
        if denominator == 0.0 {
            return None;
        }
        Some((n11 * n00 - n10 * n01) / denominator)
    }

    /// Iterates all annotated entities, in arbitrary order
    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.entity_terms.keys().map(String::as_str)
    }

    /// Returns all terms with at least one annotation
    pub fn terms(&self) -> TermGroup {
        self.term_entities.keys().copied().collect()
    }

    /// Returns the number of annotated entities
    pub fn len(&self) -> usize {
        self.entity_terms.len()
    }

    /// Returns `true` if no entity is annotated
    pub fn is_empty(&self) -> bool {
        self.entity_terms.is_empty()
    }

    /// Returns the total number of entity to term annotations
    pub fn size(&self) -> usize {
        self.entity_terms.values().map(TermGroup::len).sum()
    }

    /// Extends the annotations along the ontology closure
    ///
    /// Every entity becomes annotated to all ancestors of its terms: all
    /// `is_a` superclasses, or all ancestors via any property with
    /// [`RelationPolicy::AllRelations`].
    pub fn propagate(&mut self, ontology: &Ontology, policy: RelationPolicy) {
        let before = self.size();
        let mut inherited: Vec<(String, TermId)> = Vec::new();
        for (entity, terms) in &self.entity_terms {
            for term in terms {
                let ancestors = match policy {
                    RelationPolicy::AllRelations => ontology.ancestors(term, None, None),
                    RelationPolicy::IsAOnly => ontology.superclasses(term, false),
                };
                inherited.extend(ancestors.into_iter().map(|ancestor| (entity.clone(), ancestor)));
            }
        }
        for (entity, term) in inherited {
            self.add(&entity, term);
        }
        debug!(
            "Propagated {} annotations to {} ({})",
            before,
            self.size(),
            policy
        );
    }
}
