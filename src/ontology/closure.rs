use std::collections::{HashMap, HashSet};

use smallvec::SmallVec;
use tracing::debug;

use crate::ontology::relationship::{best_relationship, Property, PropertyId, Relationship};
use crate::term::{TermGroup, TermId};

/// Relationships between one (child, ancestor) pair
///
/// Most pairs are connected through one or two distinct relationships only
pub type Relationships = SmallVec<[Relationship; 2]>;

type Table = HashMap<TermId, HashMap<TermId, Relationships>>;

/// The relationship table of the ontology, indexed in both directions
///
/// The table stores every known `child -> ancestor` [`Relationship`]. Raw
/// facts are added by the ontology loader, then [`RelationshipMap::compute_closure`]
/// derives all transitive relationships. Queries select the "best"
/// relationship of a pair on demand, so the table keeps all distinct
/// `(distance, property)` combinations of every pair.
///
/// # Examples
///
/// ```
/// use goenrichment::ontology::{Relationship, RelationshipMap};
/// use goenrichment::TermId;
///
/// let mut map = RelationshipMap::default();
/// map.add(2u32.into(), 1u32.into(), Relationship::is_a());
/// map.add(3u32.into(), 2u32.into(), Relationship::is_a());
///
/// assert!(!map.contains(3u32.into(), 1u32.into()));
///
/// let added = map.compute_closure();
/// assert_eq!(added, 1);
/// assert_eq!(map.distance(3u32.into(), 1u32.into()), Some(2));
/// ```
#[derive(Debug, Default, Clone)]
pub struct RelationshipMap {
    /// child -> ancestor -> relationships
    ancestors: Table,
    /// ancestor -> child -> relationships
    descendants: Table,
    /// pairs of `(p1, p2)` where `p1` is transitive over `p2`
    transitive_over: HashSet<(PropertyId, PropertyId)>,
    len: usize,
}

impl RelationshipMap {
    /// Returns the total number of stored relationships
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map does not contain any relationship
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Records that `property` is transitive over `other`
    ///
    /// A transitive property is transitive over itself.
    pub fn add_transitive_over(&mut self, property: PropertyId, other: PropertyId) {
        self.transitive_over.insert((property, other));
    }

    /// Returns `true` if `property` is transitive over `other`
    pub fn is_transitive_over(&self, property: PropertyId, other: PropertyId) -> bool {
        self.transitive_over.contains(&(property, other))
    }

    /// Adds the relationship `child -> parent`
    ///
    /// Returns `false` if an identical relationship (same distance and
    /// property) between the two terms was already present.
    pub fn add(&mut self, child: TermId, parent: TermId, relationship: Relationship) -> bool {
        let rels = self
            .ancestors
            .entry(child)
            .or_default()
            .entry(parent)
            .or_default();
        if rels.iter().any(|r| r.identical(&relationship)) {
            return false;
        }
        rels.push(relationship);
        self.descendants
            .entry(parent)
            .or_default()
            .entry(child)
            .or_default()
            .push(relationship);
        self.len += 1;
        true
    }

    /// Computes the transitive closure of all relationships
    ///
    /// Every known relationship `i -> j` is chained with every direct child
    /// (or equivalent term) `h` of `i` to derive `h -> j`. The relationships
    /// are processed as a worklist: each newly derived relationship is
    /// chained again, both as the ancestor side and, if it spans at most one
    /// edge, as the child side. The iteration stops when the worklist is
    /// empty, so the result does not depend on the processing order.
    ///
    /// Two relationships are only chained if one of them is `is_a`, or the
    /// child-side property is transitive over the parent-side property.
    ///
    /// Returns the number of added relationships. Running the method a
    /// second time does not add anything.
    ///
    /// The relationships must form a directed acyclic graph
    /// (not counting equivalences).
    pub fn compute_closure(&mut self) -> usize {
        let initial = self.len;
        let mut pending: Vec<(TermId, TermId, Relationship)> = self
            .ancestors
            .iter()
            .flat_map(|(child, ancestors)| {
                ancestors.iter().flat_map(move |(ancestor, rels)| {
                    rels.iter().map(move |r| (*child, *ancestor, *r))
                })
            })
            .collect();
        pending.sort_unstable_by_key(|(child, ancestor, r)| (*child, *ancestor, r.distance()));
        debug!("Computing closure of {} relationships", pending.len());

        while let Some((child, ancestor, relationship)) = pending.pop() {
            // `child -> ancestor` as the upper part of a chain
            for (term, lower) in self.direct_relationships_of_children(child) {
                self.derive(term, ancestor, &lower, &relationship, &mut pending);
            }
            // `child -> ancestor` as the lower part of a chain
            if relationship.distance() <= 1 {
                for (term, upper) in self.relationships_to_ancestors(ancestor) {
                    self.derive(child, term, &relationship, &upper, &mut pending);
                }
            }
        }
        self.len - initial
    }

    /// Chains `lower` (`child -> i`) with `upper` (`i -> ancestor`) and
    /// queues the result if it is new
    fn derive(
        &mut self,
        child: TermId,
        ancestor: TermId,
        lower: &Relationship,
        upper: &Relationship,
        pending: &mut Vec<(TermId, TermId, Relationship)>,
    ) {
        if child == ancestor || !self.can_chain(lower, upper) {
            return;
        }
        let relationship = Relationship::chain(lower, upper);
        if self.add(child, ancestor, relationship) {
            pending.push((child, ancestor, relationship));
        }
    }

    fn can_chain(&self, lower: &Relationship, upper: &Relationship) -> bool {
        match (lower.property(), upper.property()) {
            (Property::IsA, _) | (_, Property::IsA) => true,
            (Property::Named(p2), Property::Named(p1)) => self.is_transitive_over(p2, p1),
        }
    }

    /// Snapshot of all direct children and equivalent terms, with their relationships
    fn direct_relationships_of_children(&self, term: TermId) -> Vec<(TermId, Relationship)> {
        self.descendants
            .get(&term)
            .map(|children| {
                children
                    .iter()
                    .flat_map(|(child, rels)| {
                        rels.iter()
                            .filter(|r| r.distance() <= 1)
                            .map(move |r| (*child, *r))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Snapshot of all ancestor relationships of the term
    fn relationships_to_ancestors(&self, term: TermId) -> Vec<(TermId, Relationship)> {
        self.ancestors
            .get(&term)
            .map(|ancestors| {
                ancestors
                    .iter()
                    .flat_map(|(ancestor, rels)| rels.iter().map(move |r| (*ancestor, *r)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns all relationships `child -> parent`
    ///
    /// The slice is empty if the terms are not related
    pub fn relationships(&self, child: TermId, parent: TermId) -> &[Relationship] {
        self.ancestors
            .get(&child)
            .and_then(|ancestors| ancestors.get(&parent))
            .map_or(&[], |rels| rels.as_slice())
    }

    /// Returns `true` if there is any relationship `child -> parent`
    pub fn contains(&self, child: TermId, parent: TermId) -> bool {
        !self.relationships(child, parent).is_empty()
    }

    /// Returns `true` if there is a relationship `child -> parent` with the given property
    pub fn has_property(&self, child: TermId, parent: TermId, property: Property) -> bool {
        self.relationships(child, parent)
            .iter()
            .any(|r| r.property() == property)
    }

    /// Returns `true` if `child` is a (direct or indirect) subclass of `parent`
    pub fn contains_subclass(&self, child: TermId, parent: TermId) -> bool {
        self.has_property(child, parent, Property::IsA)
    }

    /// Returns the relationship `child -> parent` with the highest precedence
    pub fn best(&self, child: TermId, parent: TermId) -> Option<Relationship> {
        best_relationship(self.relationships(child, parent))
    }

    /// Returns the minimal distance between `child` and `parent`
    ///
    /// Returns `Some(0)` if both terms are identical and `None` if they are not related
    pub fn distance(&self, child: TermId, parent: TermId) -> Option<u32> {
        if child == parent {
            return Some(0);
        }
        self.relationships(child, parent)
            .iter()
            .map(Relationship::distance)
            .min()
    }

    /// Returns all ancestors of `term`, optionally filtered by exact distance and property
    pub fn ancestors(
        &self,
        term: TermId,
        distance: Option<u32>,
        property: Option<Property>,
    ) -> TermGroup {
        filter_related(self.ancestors.get(&term), distance, property)
    }

    /// Returns all descendants of `term`, optionally filtered by exact distance and property
    pub fn descendants(
        &self,
        term: TermId,
        distance: Option<u32>,
        property: Option<Property>,
    ) -> TermGroup {
        filter_related(self.descendants.get(&term), distance, property)
    }

    /// Returns all terms that have at least one descendant
    pub fn parent_terms(&self) -> TermGroup {
        self.descendants.keys().copied().collect()
    }

    /// Returns all terms that have at least one ancestor
    pub fn child_terms(&self) -> TermGroup {
        self.ancestors.keys().copied().collect()
    }
}

fn filter_related(
    related: Option<&HashMap<TermId, Relationships>>,
    distance: Option<u32>,
    property: Option<Property>,
) -> TermGroup {
    let Some(related) = related else {
        return TermGroup::default();
    };
    related
        .iter()
        .filter(|(_, rels)| {
            rels.iter().any(|r| {
                distance.map_or(true, |d| r.distance() == d)
                    && property.map_or(true, |p| r.property() == p)
            })
        })
        .map(|(term, _)| *term)
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn id(n: u32) -> TermId {
        TermId::from(n)
    }

    fn named(n: u32) -> Property {
        Property::Named(PropertyId::from(n))
    }

    /// ```text
    ///       1
    ///     /   \
    ///    2     3
    ///     \   /  \
    ///      4      5
    ///      |
    ///      6
    /// ```
    fn diamond() -> RelationshipMap {
        let mut map = RelationshipMap::default();
        map.add(id(2), id(1), Relationship::is_a());
        map.add(id(3), id(1), Relationship::is_a());
        map.add(id(4), id(2), Relationship::is_a());
        map.add(id(4), id(3), Relationship::is_a());
        map.add(id(5), id(3), Relationship::is_a());
        map.add(id(6), id(4), Relationship::is_a());
        map
    }

    #[test]
    fn duplicate_facts_are_ignored() {
        let mut map = RelationshipMap::default();
        assert!(map.add(id(2), id(1), Relationship::is_a()));
        assert!(!map.add(id(2), id(1), Relationship::is_a()));
        assert!(map.add(id(2), id(1), Relationship::new(1, named(1))));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn closure_of_diamond() {
        let mut map = diamond();
        map.compute_closure();

        assert_eq!(map.distance(id(4), id(1)), Some(2));
        assert_eq!(map.distance(id(6), id(1)), Some(3));
        assert_eq!(map.distance(id(6), id(3)), Some(2));
        assert_eq!(map.distance(id(5), id(2)), None);
        assert_eq!(map.distance(id(5), id(5)), Some(0));

        // both paths 4 -> 2 -> 1 and 4 -> 3 -> 1 have the same length
        assert_eq!(map.relationships(id(4), id(1)).len(), 1);

        let expected: TermGroup = [2, 3, 4, 5, 6].into_iter().map(id).collect();
        assert_eq!(map.descendants(id(1), None, None), expected);

        let expected: TermGroup = [1, 2, 3, 4].into_iter().map(id).collect();
        assert_eq!(map.ancestors(id(6), None, None), expected);

        let expected: TermGroup = [2, 3].into_iter().map(id).collect();
        assert_eq!(map.ancestors(id(6), Some(2), None), expected);
    }

    #[test]
    fn closure_keeps_all_distances() {
        let mut map = diamond();
        // shortcut from 6 directly to 3
        map.add(id(6), id(3), Relationship::is_a());
        map.compute_closure();

        let distances: Vec<u32> = map
            .relationships(id(6), id(1))
            .iter()
            .map(Relationship::distance)
            .collect();
        assert!(distances.contains(&2));
        assert!(distances.contains(&3));
        assert_eq!(map.distance(id(6), id(1)), Some(2));
        assert_eq!(map.best(id(6), id(1)).unwrap().distance(), 2);
    }

    #[test]
    fn closure_is_idempotent() {
        let mut map = diamond();
        let added = map.compute_closure();
        assert!(added > 0);
        let count = map.len();
        assert_eq!(map.compute_closure(), 0);
        assert_eq!(map.len(), count);
    }

    #[test]
    fn named_properties_need_transitivity() {
        // 3 part_of 2 part_of 1
        let mut map = RelationshipMap::default();
        map.add(id(2), id(1), Relationship::new(1, named(1)));
        map.add(id(3), id(2), Relationship::new(1, named(1)));
        map.compute_closure();
        assert!(!map.contains(id(3), id(1)));

        let mut map = RelationshipMap::default();
        map.add_transitive_over(PropertyId::from(1), PropertyId::from(1));
        map.add(id(2), id(1), Relationship::new(1, named(1)));
        map.add(id(3), id(2), Relationship::new(1, named(1)));
        map.compute_closure();
        assert!(map.has_property(id(3), id(1), named(1)));
    }

    #[test]
    fn is_a_yields_to_named_property() {
        // 3 is_a 2 part_of 1 => 3 part_of 1
        let mut map = RelationshipMap::default();
        map.add(id(2), id(1), Relationship::new(1, named(1)));
        map.add(id(3), id(2), Relationship::is_a());
        // 5 part_of 4 is_a 1 => 5 part_of 1
        map.add(id(4), id(1), Relationship::is_a());
        map.add(id(5), id(4), Relationship::new(1, named(1)));
        map.compute_closure();

        assert!(map.has_property(id(3), id(1), named(1)));
        assert!(!map.contains_subclass(id(3), id(1)));
        assert!(map.has_property(id(5), id(1), named(1)));
        assert!(!map.contains_subclass(id(5), id(1)));
    }

    #[test]
    fn is_a_outranks_named_relationship() {
        // 3 part_of 1 directly, and 3 is_a 2 is_a 1
        let mut map = RelationshipMap::default();
        map.add(id(3), id(1), Relationship::new(1, named(1)));
        map.add(id(3), id(2), Relationship::is_a());
        map.add(id(2), id(1), Relationship::is_a());
        map.compute_closure();

        let best = map.best(id(3), id(1)).unwrap();
        assert!(best.property().is_a());
        assert_eq!(best.distance(), 2);
        assert_eq!(map.distance(id(3), id(1)), Some(1));
    }

    #[test]
    fn equivalences_inherit_ancestors() {
        // 3 is equivalent to 2, 2 is_a 1
        let mut map = RelationshipMap::default();
        map.add(id(2), id(1), Relationship::is_a());
        map.add(id(3), id(2), Relationship::new(0, Property::IsA));
        map.compute_closure();

        assert_eq!(map.distance(id(3), id(1)), Some(1));
        let equivalents: TermGroup = [id(3)].into_iter().collect();
        assert_eq!(map.descendants(id(2), Some(0), None), equivalents);
    }

    #[test]
    fn children_of_equivalent_terms() {
        // 4 is_a 3, 3 is equivalent to 2, 2 is_a 1
        for _ in 0..50 {
            let mut map = RelationshipMap::default();
            map.add(id(4), id(3), Relationship::is_a());
            map.add(id(3), id(2), Relationship::new(0, Property::IsA));
            map.add(id(2), id(1), Relationship::is_a());
            assert_eq!(map.compute_closure(), 3);

            assert_eq!(map.distance(id(3), id(1)), Some(1));
            assert_eq!(map.distance(id(4), id(2)), Some(1));
            assert_eq!(map.distance(id(4), id(1)), Some(2));
            assert!(map.contains_subclass(id(4), id(1)));
        }
    }

    #[test]
    fn equivalence_in_the_middle_of_a_chain() {
        // 5 is_a 4 is_a 3, 3 is equivalent to 2, 2 is_a 1
        let mut map = RelationshipMap::default();
        map.add(id(5), id(4), Relationship::is_a());
        map.add(id(4), id(3), Relationship::is_a());
        map.add(id(3), id(2), Relationship::new(0, Property::IsA));
        map.add(id(2), id(1), Relationship::is_a());
        map.compute_closure();

        let expected: TermGroup = [1, 2, 3, 4].into_iter().map(id).collect();
        assert_eq!(map.ancestors(id(5), None, None), expected);
        assert_eq!(map.distance(id(5), id(1)), Some(3));
        assert_eq!(map.distance(id(5), id(2)), Some(2));
        assert_eq!(map.compute_closure(), 0);
    }

    #[test]
    fn unknown_terms_are_empty() {
        let map = diamond();
        assert!(map.ancestors(id(99), None, None).is_empty());
        assert!(map.descendants(id(99), None, None).is_empty());
        assert!(map.relationships(id(99), id(1)).is_empty());
        assert!(map.best(id(99), id(1)).is_none());
        assert_eq!(map.distance(id(99), id(1)), None);
    }
}
