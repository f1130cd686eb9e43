use crate::term::{Branch, TermId};

/// The owned record of a term inside the ontology arena
///
/// Relationships are not stored on the term itself but in the
/// ontology's [`crate::ontology::RelationshipMap`].
#[derive(Debug, Clone)]
pub(crate) struct TermInternal {
    id: TermId,
    local_name: String,
    label: String,
    branch: Branch,
}

impl TermInternal {
    pub fn new(id: TermId, local_name: &str, label: &str, branch: Branch) -> TermInternal {
        TermInternal {
            id,
            local_name: local_name.to_string(),
            label: label.to_string(),
            branch,
        }
    }

    pub fn id(&self) -> &TermId {
        &self.id
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn branch(&self) -> Branch {
        self.branch
    }
}

impl PartialEq for TermInternal {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TermInternal {}
