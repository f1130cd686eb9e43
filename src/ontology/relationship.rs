use std::cmp::Ordering;
use std::fmt::Display;

/// Identifier of a named object property, e.g. `part_of`
#[derive(Copy, Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PropertyId {
    inner: u32,
}

impl PropertyId {
    /// Returns the integer representation of the `PropertyId`
    pub fn as_u32(&self) -> u32 {
        self.inner
    }
}

impl From<u32> for PropertyId {
    fn from(inner: u32) -> Self {
        Self { inner }
    }
}

impl Display for PropertyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Property({})", self.inner)
    }
}

/// The kind of a relationship between two terms
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Property {
    /// The hierarchical subclass relation
    IsA,
    /// A named, non-hierarchical relation (a restriction on an object property)
    Named(PropertyId),
}

impl Property {
    /// Returns `true` for [`Property::IsA`]
    pub fn is_a(&self) -> bool {
        matches!(self, Property::IsA)
    }
}

impl From<PropertyId> for Property {
    fn from(id: PropertyId) -> Self {
        Property::Named(id)
    }
}

/// A directed relationship from a child term to one of its ancestors
///
/// The `distance` is the number of direct edges the relationship spans:
/// `0` for an equivalence, `1` for a direct edge and more for relationships
/// derived by the transitive closure.
///
/// Two relationships are equal if they have the same [`Property`], regardless
/// of their distance. This allows checking whether two terms are related
/// through any `is_a` (or any `part_of`) path.
///
/// # Examples
///
/// ```
/// use goenrichment::ontology::{Property, PropertyId, Relationship};
///
/// let near = Relationship::new(1, Property::IsA);
/// let far = Relationship::new(4, Property::IsA);
/// let part_of = Relationship::new(1, Property::Named(PropertyId::from(1)));
///
/// assert_eq!(near, far);
/// assert_ne!(near, part_of);
///
/// // is_a outranks every other property, regardless of distance
/// assert!(far.outranks(&part_of));
/// // shorter is_a relationships outrank longer ones
/// assert!(near.outranks(&far));
/// ```
#[derive(Copy, Clone, Debug)]
pub struct Relationship {
    distance: u32,
    property: Property,
}

impl Relationship {
    /// Constructs a new `Relationship`
    pub fn new(distance: u32, property: Property) -> Self {
        Self { distance, property }
    }

    /// Constructs a direct `is_a` relationship
    pub fn is_a() -> Self {
        Self::new(1, Property::IsA)
    }

    /// The number of direct edges spanned by the relationship
    pub fn distance(&self) -> u32 {
        self.distance
    }

    /// The kind of the relationship
    pub fn property(&self) -> Property {
        self.property
    }

    /// Returns `true` if both relationships have the same distance and property
    pub fn identical(&self, other: &Relationship) -> bool {
        self.distance == other.distance && self.property == other.property
    }

    /// Compares two relationships by their precedence
    ///
    /// `is_a` relationships supersede all other properties. Among two `is_a`
    /// relationships the shorter one is better. All other combinations are
    /// considered equal.
    pub fn precedence(&self, other: &Relationship) -> Ordering {
        match (self.property.is_a(), other.property.is_a()) {
            (true, true) => other.distance.cmp(&self.distance),
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => Ordering::Equal,
        }
    }

    /// Returns `true` if `self` has a strictly higher precedence than `other`
    pub fn outranks(&self, other: &Relationship) -> bool {
        self.precedence(other) == Ordering::Greater
    }

    /// Chains the relationship `h -> i` (`lower`) with `i -> j` (`upper`)
    /// into the relationship `h -> j`
    ///
    /// The distances add up. The property of the lower (child-side)
    /// relationship is kept, unless it is `is_a` and the upper one is not.
    /// `is_a` acts as the identity: chaining it with any other property
    /// yields that other property.
    ///
    /// The caller is responsible for checking whether the two properties
    /// may be chained at all.
    pub fn chain(lower: &Relationship, upper: &Relationship) -> Relationship {
        let property = if lower.property.is_a() && !upper.property.is_a() {
            upper.property
        } else {
            lower.property
        };
        Relationship::new(lower.distance + upper.distance, property)
    }
}

impl PartialEq for Relationship {
    fn eq(&self, other: &Self) -> bool {
        self.property == other.property
    }
}

impl Eq for Relationship {}

/// Returns the relationship with the highest precedence
///
/// Among several equally ranked relationships, the first one wins.
pub(crate) fn best_relationship<'a, I: IntoIterator<Item = &'a Relationship>>(
    relationships: I,
) -> Option<Relationship> {
    relationships.into_iter().fold(None, |best, rel| match best {
        Some(current) if !rel.outranks(&current) => Some(current),
        _ => Some(*rel),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn part_of() -> Property {
        Property::Named(PropertyId::from(7))
    }

    #[test]
    fn equality_ignores_distance() {
        assert_eq!(
            Relationship::new(1, Property::IsA),
            Relationship::new(3, Property::IsA)
        );
        assert_ne!(
            Relationship::new(1, Property::IsA),
            Relationship::new(1, part_of())
        );
        assert!(!Relationship::new(1, Property::IsA).identical(&Relationship::new(3, Property::IsA)));
    }

    #[test]
    fn precedence() {
        let is_a_far = Relationship::new(5, Property::IsA);
        let is_a_near = Relationship::new(2, Property::IsA);
        let named = Relationship::new(1, part_of());
        let other_named = Relationship::new(1, Property::Named(PropertyId::from(8)));

        assert_eq!(is_a_far.precedence(&named), Ordering::Greater);
        assert_eq!(named.precedence(&is_a_far), Ordering::Less);
        assert_eq!(is_a_near.precedence(&is_a_far), Ordering::Greater);
        assert_eq!(named.precedence(&other_named), Ordering::Equal);
    }

    #[test]
    fn best_of_many() {
        let rels = vec![
            Relationship::new(1, part_of()),
            Relationship::new(4, Property::IsA),
            Relationship::new(2, Property::IsA),
            Relationship::new(2, Property::IsA),
        ];
        let best = best_relationship(&rels).unwrap();
        assert_eq!(best.distance(), 2);
        assert!(best.property().is_a());

        assert!(best_relationship(&Vec::<Relationship>::new()).is_none());
    }

    #[test]
    fn best_keeps_first_of_equals() {
        let rels = vec![
            Relationship::new(3, part_of()),
            Relationship::new(1, Property::Named(PropertyId::from(8))),
        ];
        assert_eq!(best_relationship(&rels).unwrap().distance(), 3);
    }

    #[test]
    fn chain_properties() {
        let is_a = Relationship::new(1, Property::IsA);
        let named = Relationship::new(2, part_of());

        let chained = Relationship::chain(&is_a, &named);
        assert_eq!(chained.property(), part_of());
        assert_eq!(chained.distance(), 3);

        let chained = Relationship::chain(&named, &is_a);
        assert_eq!(chained.property(), part_of());

        let chained = Relationship::chain(&is_a, &is_a);
        assert!(chained.property().is_a());
        assert_eq!(chained.distance(), 2);

        let regulates = Relationship::new(1, Property::Named(PropertyId::from(9)));
        assert_eq!(Relationship::chain(&regulates, &named).property(), regulates.property());
    }
}
