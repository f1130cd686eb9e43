use std::collections::HashMap;
use std::marker::PhantomData;

use tracing::debug;

use crate::ontology::closure::RelationshipMap;
use crate::ontology::relationship::{Property, PropertyId, Relationship};
use crate::ontology::termarena::Arena;
use crate::term::internal::TermInternal;
use crate::{Branch, GoError, GoResult, Ontology, PerBranch, TermId};

/// Builder state: terms, properties and roots can be added
pub struct LooseCollection;
/// Builder state: all terms are known, relationships can be added
pub struct AllTerms;
/// Builder state: the transitive closure is computed
pub struct ConnectedTerms;

/// A named object property, e.g. `part_of`
#[derive(Debug, Clone)]
pub(crate) struct PropertyRecord {
    pub name: String,
    pub transitive: bool,
}

fn transition_state<TX, TY>(builder: Builder<TX>) -> Builder<TY> {
    Builder::<TY> {
        terms: builder.terms,
        aliases: builder.aliases,
        properties: builder.properties,
        relationships: builder.relationships,
        roots: builder.roots,
        state: PhantomData,
    }
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Assembles an [`Ontology`] from the records of an ontology loader
///
/// The builder enforces the loading order through its type state:
///
/// ```mermaid
/// stateDiagram-v2
///     LooseCollection --> LooseCollection: add_term, add_property, set_root
///     LooseCollection --> AllTerms: terms_complete()
///     AllTerms --> AllTerms: add_relationship, add_transitive_over
///     AllTerms --> ConnectedTerms: connect_all_terms()
///     ConnectedTerms --> Ontology: build()
/// ```
///
/// # Examples
///
/// ```
/// use goenrichment::ontology::{Builder, Property};
/// use goenrichment::Branch;
///
/// let mut builder = Builder::new();
/// builder.add_term(1u32, "GO:0003674", "molecular_function", Branch::MolecularFunction);
/// builder.add_term(2u32, "GO:0008150", "biological_process", Branch::BiologicalProcess);
/// builder.add_term(3u32, "GO:0005575", "cellular_component", Branch::CellularComponent);
/// builder.add_term(4u32, "GO:0009987", "cellular process", Branch::BiologicalProcess);
/// builder.add_term(5u32, "GO:0008152", "metabolic process", Branch::BiologicalProcess);
/// builder.set_root(Branch::MolecularFunction, 1u32).unwrap();
/// builder.set_root(Branch::BiologicalProcess, 2u32).unwrap();
/// builder.set_root(Branch::CellularComponent, 3u32).unwrap();
///
/// let mut builder = builder.terms_complete();
/// builder.add_relationship(4u32, 2u32, 1, Property::IsA).unwrap();
/// builder.add_relationship(5u32, 4u32, 1, Property::IsA).unwrap();
///
/// let ontology = builder.connect_all_terms().build().unwrap();
/// assert_eq!(ontology.len(), 5);
/// assert_eq!(ontology.distance(5u32.into(), 2u32.into()), Some(2));
/// ```
pub struct Builder<T> {
    terms: Arena,
    aliases: HashMap<String, String>,
    properties: HashMap<PropertyId, PropertyRecord>,
    relationships: RelationshipMap,
    roots: PerBranch<Option<TermId>>,
    state: PhantomData<T>,
}

impl Default for Builder<LooseCollection> {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder<LooseCollection> {
    /// Constructs a new, empty `Builder`
    pub fn new() -> Builder<LooseCollection> {
        Builder::<LooseCollection> {
            terms: Arena::default(),
            aliases: HashMap::default(),
            properties: HashMap::default(),
            relationships: RelationshipMap::default(),
            roots: PerBranch::default(),
            state: PhantomData,
        }
    }

    /// Adds a term to the ontology
    ///
    /// Adding a term with an existing id replaces the previous term.
    pub fn add_term<I: Into<TermId>>(
        &mut self,
        id: I,
        local_name: &str,
        label: &str,
        branch: Branch,
    ) -> TermId {
        let id = id.into();
        self.terms
            .insert(TermInternal::new(id, local_name, label, branch));
        id
    }

    /// Registers `alias` as an alternative local name of the term `local_name`
    pub fn add_alias(&mut self, alias: &str, local_name: &str) {
        self.aliases.insert(alias.to_string(), local_name.to_string());
    }

    /// Declares a named object property
    ///
    /// A transitive property is transitive over itself.
    pub fn add_property<I: Into<PropertyId>>(&mut self, id: I, name: &str, transitive: bool) {
        let id = id.into();
        self.properties.insert(
            id,
            PropertyRecord {
                name: name.to_string(),
                transitive,
            },
        );
        if transitive {
            self.relationships.add_transitive_over(id, id);
        }
    }

    /// Declares the root term of a branch
    ///
    /// # Errors
    ///
    /// - [`GoError::DoesNotExist`] if the term was not added before
    /// - [`GoError::DuplicateRoot`] if the branch already has a different root
    pub fn set_root<I: Into<TermId>>(&mut self, branch: Branch, id: I) -> GoResult<()> {
        let id = id.into();
        if !self.terms.contains(id) {
            return Err(GoError::DoesNotExist);
        }
        match self.roots[branch] {
            Some(existing) if existing != id => Err(GoError::DuplicateRoot(branch)),
            _ => {
                self.roots[branch] = Some(id);
                Ok(())
            }
        }
    }

    /// Finishes adding terms
    #[must_use]
    pub fn terms_complete(self) -> Builder<AllTerms> {
        debug!(
            "Loaded {} terms and {} properties",
            self.terms.len(),
            self.properties.len()
        );
        transition_state(self)
    }
}

impl Builder<AllTerms> {
    /// Adds a raw relationship fact `child -> parent`
    ///
    /// `distance` is `1` for a direct subclass or restriction and `0` for
    /// an equivalence. Duplicate facts are ignored.
    ///
    /// Returns `true` if the relationship was newly added.
    ///
    /// # Errors
    ///
    /// - [`GoError::DoesNotExist`] if one of the terms is unknown
    /// - [`GoError::UnknownProperty`] if the property was not declared
    /// - [`GoError::InvalidRelationship`] for self-loops and distances other than 0 or 1
    pub fn add_relationship<I: Into<TermId>, J: Into<TermId>>(
        &mut self,
        child: I,
        parent: J,
        distance: u32,
        property: Property,
    ) -> GoResult<bool> {
        let child = child.into();
        let parent = parent.into();
        if !self.terms.contains(child) || !self.terms.contains(parent) {
            return Err(GoError::DoesNotExist);
        }
        if distance > 1 {
            return Err(GoError::InvalidRelationship(format!(
                "{child} -> {parent} has distance {distance}"
            )));
        }
        if child == parent && distance > 0 {
            return Err(GoError::InvalidRelationship(format!(
                "{child} is its own parent"
            )));
        }
        if let Property::Named(id) = property {
            if !self.properties.contains_key(&id) {
                return Err(GoError::UnknownProperty(id.as_u32()));
            }
        }
        Ok(self
            .relationships
            .add(child, parent, Relationship::new(distance, property)))
    }

    /// Declares that `property` is transitive over `other`
    ///
    /// # Errors
    ///
    /// [`GoError::UnknownProperty`] if one of the properties was not declared
    pub fn add_transitive_over<I: Into<PropertyId>, J: Into<PropertyId>>(
        &mut self,
        property: I,
        other: J,
    ) -> GoResult<()> {
        let property = property.into();
        let other = other.into();
        for id in [property, other] {
            if !self.properties.contains_key(&id) {
                return Err(GoError::UnknownProperty(id.as_u32()));
            }
        }
        self.relationships.add_transitive_over(property, other);
        Ok(())
    }

    /// Computes the transitive closure of all relationships
    ///
    /// No relationships can be added afterwards.
    #[must_use]
    pub fn connect_all_terms(mut self) -> Builder<ConnectedTerms> {
        let raw = self.relationships.len();
        let added = self.relationships.compute_closure();
        debug!(
            "Transitive closure extended {} relationships by {}",
            raw, added
        );
        transition_state(self)
    }
}

impl Builder<ConnectedTerms> {
    /// Builds the [`Ontology`]
    ///
    /// # Errors
    ///
    /// [`GoError::MissingRoot`] if a branch has no root term
    pub fn build(self) -> GoResult<Ontology> {
        let mut roots = PerBranch::<TermId>::default();
        for branch in Branch::ALL {
            roots[branch] = self.roots[branch].ok_or(GoError::MissingRoot(branch))?;
        }
        let mut aliases = HashMap::with_capacity(self.aliases.len());
        for (alias, name) in self.aliases {
            if let Some(id) = self.terms.id_by_name(&name) {
                aliases.insert(alias, id);
            }
        }
        Ok(Ontology::new(
            self.terms,
            aliases,
            self.properties,
            self.relationships,
            roots,
        ))
    }
}
