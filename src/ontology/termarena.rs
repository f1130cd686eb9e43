use std::collections::hash_map::Values;
use std::collections::HashMap;

use crate::term::internal::TermInternal;
use crate::TermId;

/// Owns all terms of the ontology, addressable by id or local name
#[derive(Debug, Default, Clone)]
pub(crate) struct Arena {
    terms: HashMap<TermId, TermInternal>,
    names: HashMap<String, TermId>,
}

impl Arena {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Inserts the term, replacing a previous term with the same id
    pub fn insert(&mut self, term: TermInternal) {
        let id = *term.id();
        if let Some(previous) = self.terms.get(&id) {
            self.names.remove(previous.local_name());
        }
        self.names.insert(term.local_name().to_string(), id);
        self.terms.insert(id, term);
    }

    pub fn get(&self, id: TermId) -> Option<&TermInternal> {
        self.terms.get(&id)
    }

    pub fn contains(&self, id: TermId) -> bool {
        self.terms.contains_key(&id)
    }

    pub fn id_by_name(&self, name: &str) -> Option<TermId> {
        self.names.get(name).copied()
    }

    pub fn values(&self) -> Values<'_, TermId, TermInternal> {
        self.terms.values()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Branch;

    #[test]
    fn replace_term_updates_names() {
        let mut arena = Arena::default();
        arena.insert(TermInternal::new(
            1u32.into(),
            "GO:0000001",
            "first",
            Branch::BiologicalProcess,
        ));
        arena.insert(TermInternal::new(
            1u32.into(),
            "GO:0000099",
            "renamed",
            Branch::BiologicalProcess,
        ));
        assert_eq!(arena.len(), 1);
        assert!(arena.id_by_name("GO:0000001").is_none());
        assert_eq!(arena.id_by_name("GO:0000099"), Some(1u32.into()));
        assert_eq!(arena.get(1u32.into()).unwrap().label(), "renamed");
    }
}
