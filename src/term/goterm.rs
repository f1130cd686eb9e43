use crate::ontology::{Property, Relationship};
use crate::term::internal::TermInternal;
use crate::term::TermGroup;
use crate::{Branch, GoError, GoResult, Ontology, TermId};

/// The `GoTerm` represents a single term of the Gene Ontology
///
/// It is a lightweight view onto the term data inside the [`Ontology`]
/// and provides access to its relationships.
#[derive(Debug, Clone, Copy)]
pub struct GoTerm<'a> {
    id: TermId,
    local_name: &'a str,
    label: &'a str,
    branch: Branch,
    ontology: &'a Ontology,
}

impl<'a> GoTerm<'a> {
    /// Constructs a new [`GoTerm`]
    ///
    /// # Errors
    ///
    /// If the given [`TermId`] does not match an existing term
    /// it returns an Error
    pub fn try_new(ontology: &'a Ontology, term: TermId) -> GoResult<GoTerm<'a>> {
        let term = ontology.get(term).ok_or(GoError::DoesNotExist)?;
        Ok(GoTerm::new(ontology, term))
    }

    pub(crate) fn new(ontology: &'a Ontology, term: &'a TermInternal) -> GoTerm<'a> {
        GoTerm {
            id: *term.id(),
            local_name: term.local_name(),
            label: term.label(),
            branch: term.branch(),
            ontology,
        }
    }

    /// Returns the [`TermId`] of the term
    pub fn id(&self) -> TermId {
        self.id
    }

    /// Returns the canonical short identifier of the term
    ///
    /// e.g.: `GO:0008150`
    pub fn local_name(&self) -> &'a str {
        self.local_name
    }

    /// Returns the label of the term
    ///
    /// e.g.: `biological_process`
    pub fn label(&self) -> &'a str {
        self.label
    }

    /// Returns the [`Branch`] of the term
    pub fn branch(&self) -> Branch {
        self.branch
    }

    /// Returns `true` if the term is the root of its branch
    pub fn is_root(&self) -> bool {
        self.ontology.root(self.branch) == self.id
    }

    /// Returns the ids of the direct parents, via any property
    pub fn parent_ids(&self) -> TermGroup {
        self.ontology.parents(self.id)
    }

    /// Returns the ids of the direct children, via any property
    pub fn children_ids(&self) -> TermGroup {
        self.ontology.children(self.id)
    }

    /// Returns the ids of all direct and indirect ancestors
    pub fn ancestor_ids(&self) -> TermGroup {
        self.ontology.ancestors(self.id, None, None)
    }

    /// Returns the ids of all direct and indirect descendants
    pub fn descendant_ids(&self) -> TermGroup {
        self.ontology.descendants(self.id, None, None)
    }

    /// Returns an iterator of the direct parents of the term
    pub fn parents(&self) -> impl Iterator<Item = GoTerm<'a>> + 'a {
        let ontology = self.ontology;
        self.parent_ids()
            .into_iter()
            .filter_map(move |id| ontology.term(id))
    }

    /// Returns an iterator of the direct children of the term
    pub fn children(&self) -> impl Iterator<Item = GoTerm<'a>> + 'a {
        let ontology = self.ontology;
        self.children_ids()
            .into_iter()
            .filter_map(move |id| ontology.term(id))
    }

    /// Returns the structural information content of the term
    ///
    /// See [`Ontology::information_content`]
    pub fn information_content(&self) -> f64 {
        self.ontology.information_content(self.id)
    }

    /// Returns the best relationship from `self` to the ancestor `other`
    pub fn relationship_to(&self, other: &GoTerm) -> Option<Relationship> {
        self.ontology.relationship(self.id, other.id)
    }

    /// Returns the minimal number of steps from `self` to the ancestor `other`
    pub fn distance_to_ancestor(&self, other: &GoTerm) -> Option<u32> {
        self.ontology.distance(self.id, other.id)
    }

    /// Returns `true` if `self` is a descendant of `other`, via any property
    pub fn child_of(&self, other: &GoTerm) -> bool {
        self.ontology.contains_relationship(self.id, other.id)
    }

    /// Returns `true` if `self` is an `is_a` descendant of `other`
    pub fn subclass_of(&self, other: &GoTerm) -> bool {
        self.ontology
            .has_property(self.id, other.id, Property::IsA)
    }
}

impl PartialEq for GoTerm<'_> {
    fn eq(&self, other: &GoTerm) -> bool {
        self.id == other.id
    }
}

impl Eq for GoTerm<'_> {}
