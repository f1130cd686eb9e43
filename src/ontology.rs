//! The Gene Ontology graph and its transitive closure
//!
//! The [`Ontology`] is assembled once with a [`Builder`] and is immutable
//! afterwards. All relationships, raw and derived, live in a
//! [`RelationshipMap`].

use core::fmt::Debug;
use std::collections::HashMap;

use crate::term::internal::TermInternal;
use crate::term::{GoTerm, TermGroup};
use crate::{Branch, PerBranch, TermId};

mod builder;
mod closure;
mod relationship;
mod termarena;

pub use builder::{AllTerms, Builder, ConnectedTerms, LooseCollection};
pub use closure::{RelationshipMap, Relationships};
pub use relationship::{Property, PropertyId, Relationship};

use builder::PropertyRecord;
use termarena::Arena;

#[cfg_attr(doc, aquamarine::aquamarine)]
/// `Ontology` is the central data structure of the `goenrichment` crate
///
/// It holds all terms of the three GO branches, the declared object
/// properties and the transitive closure of all relationships between terms.
///
/// # Layout
///
/// Every term belongs to one [`Branch`] and every branch has exactly one
/// root term. Terms are connected by directed relationships from a child
/// to an ancestor. A relationship has a distance and a [`Property`]:
/// either the hierarchical `is_a` or a named property such as `part_of`.
///
/// ```mermaid
/// erDiagram
///     ONTOLOGY ||--|{ GOTERM : contains
///     ONTOLOGY ||--|| RELATIONSHIPMAP : closure
///     RELATIONSHIPMAP ||--|{ RELATIONSHIP : stores
///     GOTERM ||--o{ RELATIONSHIP : child
///     GOTERM ||--o{ RELATIONSHIP : ancestor
///     GOTERM {
///         TermId id
///         str local_name
///         str label
///         Branch branch
///     }
///     RELATIONSHIP {
///         u32 distance
///         Property property
///     }
/// ```
///
/// # Examples
///
/// ```
/// use goenrichment::ontology::{Ontology, Property};
/// use goenrichment::{Branch, TermId};
///
/// let mut builder = Ontology::builder();
/// builder.add_term(1u32, "GO:0003674", "molecular_function", Branch::MolecularFunction);
/// builder.add_term(2u32, "GO:0008150", "biological_process", Branch::BiologicalProcess);
/// builder.add_term(3u32, "GO:0005575", "cellular_component", Branch::CellularComponent);
/// builder.add_term(4u32, "GO:0009987", "cellular process", Branch::BiologicalProcess);
/// builder.add_term(5u32, "GO:0007049", "cell cycle", Branch::BiologicalProcess);
/// builder.set_root(Branch::MolecularFunction, 1u32).unwrap();
/// builder.set_root(Branch::BiologicalProcess, 2u32).unwrap();
/// builder.set_root(Branch::CellularComponent, 3u32).unwrap();
///
/// let mut builder = builder.terms_complete();
/// builder.add_relationship(4u32, 2u32, 1, Property::IsA).unwrap();
/// builder.add_relationship(5u32, 4u32, 1, Property::IsA).unwrap();
/// let ontology = builder.connect_all_terms().build().unwrap();
///
/// let term = ontology.term_by_name("GO:0007049").unwrap();
/// assert_eq!(term.label(), "cell cycle");
/// assert_eq!(term.ancestor_ids().len(), 2);
///
/// let root = ontology.root(Branch::BiologicalProcess);
/// assert!(ontology.contains_subclass(term.id(), root));
/// assert_eq!(ontology.information_content(root), 0.0);
/// ```
#[derive(Default)]
pub struct Ontology {
    terms: Arena,
    aliases: HashMap<String, TermId>,
    properties: HashMap<PropertyId, PropertyRecord>,
    relationships: RelationshipMap,
    roots: PerBranch<TermId>,
}

impl Debug for Ontology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Ontology with {} terms and {} relationships",
            self.terms.len(),
            self.relationships.len()
        )
    }
}

impl Ontology {
    pub(crate) fn new(
        terms: Arena,
        aliases: HashMap<String, TermId>,
        properties: HashMap<PropertyId, PropertyRecord>,
        relationships: RelationshipMap,
        roots: PerBranch<TermId>,
    ) -> Self {
        Self {
            terms,
            aliases,
            properties,
            relationships,
            roots,
        }
    }

    /// Returns a new [`Builder`] to assemble an `Ontology`
    pub fn builder() -> Builder<LooseCollection> {
        Builder::new()
    }

    /// Returns the number of terms in the ontology
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if the ontology does not contain any terms
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn get(&self, id: TermId) -> Option<&TermInternal> {
        self.terms.get(id)
    }

    /// Returns the [`GoTerm`] of the provided [`TermId`]
    ///
    /// If no such term is present in the ontology, `None` is returned
    pub fn term<I: Into<TermId>>(&self, id: I) -> Option<GoTerm<'_>> {
        GoTerm::try_new(self, id.into()).ok()
    }

    /// Returns the [`GoTerm`] with the given local name, e.g. `GO:0008150`
    ///
    /// Alternative ids of a term are resolved as well.
    pub fn term_by_name(&self, name: &str) -> Option<GoTerm<'_>> {
        let id = self
            .terms
            .id_by_name(name)
            .or_else(|| self.aliases.get(name).copied())?;
        self.term(id)
    }

    /// Returns an Iterator of all [`GoTerm`]s of the ontology
    pub fn iter(&self) -> Iter<'_> {
        self.into_iter()
    }

    /// Returns the root term of the branch
    pub fn root(&self, branch: Branch) -> TermId {
        self.roots[branch]
    }

    /// Returns the branch of the term, or `None` if the term is unknown
    pub fn branch_of(&self, term: TermId) -> Option<Branch> {
        self.terms.get(term).map(TermInternal::branch)
    }

    /// Returns the name of a property
    ///
    /// `is_a` is returned for [`Property::IsA`], `None` for undeclared properties
    pub fn property_name(&self, property: Property) -> Option<&str> {
        match property {
            Property::IsA => Some("is_a"),
            Property::Named(id) => self.properties.get(&id).map(|p| p.name.as_str()),
        }
    }

    /// Returns `true` if the property was declared transitive
    pub fn is_transitive(&self, property: PropertyId) -> bool {
        self.properties.get(&property).map_or(false, |p| p.transitive)
    }

    /// Returns the total number of relationships, including all derived ones
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Returns the underlying relationship table
    pub fn relationship_map(&self) -> &RelationshipMap {
        &self.relationships
    }

    /// Returns all ancestors of the term
    ///
    /// Ancestors can be filtered by their exact distance and by property
    pub fn ancestors(
        &self,
        term: TermId,
        distance: Option<u32>,
        property: Option<Property>,
    ) -> TermGroup {
        self.relationships.ancestors(term, distance, property)
    }

    /// Returns all descendants of the term
    ///
    /// Descendants can be filtered by their exact distance and by property
    pub fn descendants(
        &self,
        term: TermId,
        distance: Option<u32>,
        property: Option<Property>,
    ) -> TermGroup {
        self.relationships.descendants(term, distance, property)
    }

    /// Returns the direct parents of the term, via any property
    pub fn parents(&self, term: TermId) -> TermGroup {
        self.ancestors(term, Some(1), None)
    }

    /// Returns the direct children of the term, via any property
    pub fn children(&self, term: TermId) -> TermGroup {
        self.descendants(term, Some(1), None)
    }

    /// Returns the `is_a` ancestors of the term
    pub fn superclasses(&self, term: TermId, direct: bool) -> TermGroup {
        let distance = if direct { Some(1) } else { None };
        self.ancestors(term, distance, Some(Property::IsA))
    }

    /// Returns the `is_a` descendants of the term
    pub fn subclasses(&self, term: TermId, direct: bool) -> TermGroup {
        let distance = if direct { Some(1) } else { None };
        self.descendants(term, distance, Some(Property::IsA))
    }

    /// Returns all terms that are equivalent to the term, via any property
    pub fn equivalences(&self, term: TermId) -> TermGroup {
        self.descendants(term, Some(0), None)
    }

    /// Returns all classes that are equivalent to the term
    pub fn equivalent_classes(&self, term: TermId) -> TermGroup {
        self.descendants(term, Some(0), Some(Property::IsA))
    }

    /// Returns the relationship `child -> parent` with the highest precedence
    pub fn relationship(&self, child: TermId, parent: TermId) -> Option<Relationship> {
        self.relationships.best(child, parent)
    }

    /// Returns all relationships `child -> parent`
    pub fn relationships(&self, child: TermId, parent: TermId) -> &[Relationship] {
        self.relationships.relationships(child, parent)
    }

    /// Returns the minimal distance from `child` to `parent`
    ///
    /// `Some(0)` if both are the same term, `None` if they are not related.
    pub fn distance(&self, child: TermId, parent: TermId) -> Option<u32> {
        self.relationships.distance(child, parent)
    }

    /// Returns `true` if `child` is related to `parent` through any property
    pub fn contains_relationship(&self, child: TermId, parent: TermId) -> bool {
        self.relationships.contains(child, parent)
    }

    /// Returns `true` if `child` is an `is_a` descendant of `parent`
    pub fn contains_subclass(&self, child: TermId, parent: TermId) -> bool {
        self.relationships.contains_subclass(child, parent)
    }

    /// Returns `true` if `child` is related to `parent` through `property`
    pub fn has_property(&self, child: TermId, parent: TermId, property: Property) -> bool {
        self.relationships.has_property(child, parent, property)
    }

    /// Returns the structural information content of the term
    ///
    /// `1 - ln(1 + |subclasses(term)|) / ln(1 + |subclasses(root)|)`,
    /// where `root` is the root of the term's branch. Leaves have an
    /// information content of `1`, the root of `0`. Unknown terms and
    /// terms of a branch without any subclasses return `0`.
    pub fn information_content(&self, term: TermId) -> f64 {
        let Some(branch) = self.branch_of(term) else {
            return 0.0;
        };
        let total = crate::f64_from_usize(self.subclasses(self.root(branch), false).len());
        if total == 0.0 {
            return 0.0;
        }
        let own = crate::f64_from_usize(self.subclasses(term, false).len());
        1.0 - own.ln_1p() / total.ln_1p()
    }

    /// Returns the most general subclasses shared by all given terms
    ///
    /// The shared subclasses are reduced to those that are not themselves
    /// a subclass of another shared subclass.
    pub fn common_subclasses(&self, terms: &TermGroup) -> TermGroup {
        let mut iter = terms.iter();
        let Some(first) = iter.next() else {
            return TermGroup::default();
        };
        let mut shared = self.subclasses(first, false);
        for term in iter {
            shared = &shared & &self.subclasses(term, false);
        }
        let candidates = shared.clone();
        shared.retain(|term| {
            !candidates
                .iter()
                .any(|other| other != *term && self.contains_subclass(*term, other))
        });
        shared
    }
}

/// Iterates the ontology and yields [`GoTerm`]s
pub struct Iter<'a> {
    inner: std::collections::hash_map::Values<'a, TermId, TermInternal>,
    ontology: &'a Ontology,
}

impl<'a> Iterator for Iter<'a> {
    type Item = GoTerm<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|term| GoTerm::new(self.ontology, term))
    }
}

impl<'a> IntoIterator for &'a Ontology {
    type Item = GoTerm<'a>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            inner: self.terms.values(),
            ontology: self,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fixture;

    fn id(n: u32) -> TermId {
        TermId::from(n)
    }

    fn group(ids: &[u32]) -> TermGroup {
        ids.iter().map(|n| id(*n)).collect()
    }

    #[test]
    fn lookups() {
        let ontology = fixture::ontology();
        assert_eq!(ontology.root(Branch::BiologicalProcess), id(2));
        assert_eq!(ontology.branch_of(id(50)), Some(Branch::CellularComponent));
        assert_eq!(ontology.branch_of(id(999)), None);
        assert!(ontology.term(999u32).is_none());
        assert_eq!(ontology.term(30u32).unwrap().label(), "term A");
        assert_eq!(ontology.iter().count(), ontology.len());
        assert_eq!(ontology.property_name(Property::IsA), Some("is_a"));
        assert_eq!(
            ontology.property_name(Property::Named(fixture::PART_OF.into())),
            Some("part_of")
        );
        assert!(ontology.is_transitive(fixture::PART_OF.into()));
        assert!(!ontology.is_transitive(fixture::REGULATES.into()));
    }

    #[test]
    fn hierarchy_queries() {
        let ontology = fixture::ontology();

        assert_eq!(ontology.parents(id(33)), group(&[31]));
        assert_eq!(ontology.children(id(30)), group(&[31, 32, 34]));
        assert_eq!(ontology.subclasses(id(30), true), group(&[31, 32]));
        assert_eq!(ontology.subclasses(id(30), false), group(&[31, 32, 33]));
        assert_eq!(ontology.superclasses(id(33), false), group(&[2, 10, 20, 30, 31]));
        assert_eq!(ontology.superclasses(id(33), true), group(&[31]));

        // 34 part_of 30: related, but not a subclass
        assert!(ontology.contains_relationship(id(34), id(30)));
        assert!(!ontology.contains_subclass(id(34), id(30)));
        assert!(ontology.has_property(id(34), id(2), Property::Named(fixture::PART_OF.into())));
    }

    #[test]
    fn distances() {
        let ontology = fixture::ontology();
        assert_eq!(ontology.distance(id(33), id(2)), Some(5));
        assert_eq!(ontology.distance(id(33), id(33)), Some(0));
        assert_eq!(ontology.distance(id(33), id(40)), None);
        assert_eq!(ontology.relationship(id(33), id(30)).unwrap().distance(), 2);
        assert!(ontology.relationship(id(40), id(30)).is_none());
    }

    #[test]
    fn transitive_part_of() {
        let ontology = fixture::ontology();
        let part_of = Property::Named(fixture::PART_OF.into());
        // 52 part_of 51 part_of 50 is_a 3
        assert!(ontology.has_property(id(52), id(50), part_of));
        assert!(ontology.has_property(id(52), id(3), part_of));
        assert!(!ontology.contains_subclass(id(52), id(3)));
        assert_eq!(ontology.distance(id(52), id(3)), Some(3));
    }

    #[test]
    fn non_transitive_property_stops() {
        let ontology = fixture::ontology();
        // 63 regulates 62 regulates 61
        assert!(ontology.contains_relationship(id(63), id(62)));
        assert!(ontology.contains_relationship(id(62), id(61)));
        assert!(!ontology.contains_relationship(id(63), id(61)));
        // is_a chains with every property
        let regulates = Property::Named(fixture::REGULATES.into());
        assert!(ontology.has_property(id(62), id(1), regulates));
    }

    #[test]
    fn information_content() {
        let ontology = fixture::ontology();
        let root = ontology.root(Branch::BiologicalProcess);
        assert_eq!(ontology.information_content(root), 0.0);
        assert!((ontology.information_content(id(33)) - 1.0).abs() < f64::EPSILON);
        let inner = ontology.information_content(id(30));
        assert!(inner > 0.0 && inner < 1.0);
        assert_eq!(ontology.information_content(id(999)), 0.0);
    }

    #[test]
    fn common_subclasses() {
        let ontology = fixture::ontology();
        // 20 and 30 share 31, 32, 33 (through 30), pruned to the most general
        assert_eq!(ontology.common_subclasses(&group(&[20, 30])), group(&[31, 32]));
        assert!(ontology.common_subclasses(&group(&[30, 40])).is_empty());
        assert!(ontology.common_subclasses(&TermGroup::new()).is_empty());
    }

    #[test]
    fn equivalences() {
        let ontology = fixture::ontology();
        assert_eq!(ontology.equivalences(id(40)), group(&[42]));
        assert_eq!(ontology.equivalent_classes(id(40)), group(&[42]));
        // the equivalent term inherits the ancestors
        assert!(ontology.contains_subclass(id(42), id(21)));
    }

    #[test]
    fn closure_is_complete() {
        let ontology = fixture::ontology();
        let count = ontology.relationship_count();
        let mut map = ontology.relationship_map().clone();
        assert_eq!(map.compute_closure(), 0);
        assert_eq!(map.len(), count);
    }
}
