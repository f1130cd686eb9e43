use crate::term::TermGroup;
use crate::TermId;

/// A single node of a family tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyNode {
    term: TermId,
    children: Vec<usize>,
}

impl FamilyNode {
    /// The term of the node
    pub fn term(&self) -> TermId {
        self.term
    }

    /// The arena indices of the child nodes
    pub fn children(&self) -> &[usize] {
        &self.children
    }
}

/// All families of one branch, stored as an arena of [`FamilyNode`]s
///
/// Every family is a tree, identified by the index of its root node.
/// Nodes refer to their children by index, so trees never own each other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FamilyForest {
    nodes: Vec<FamilyNode>,
    roots: Vec<usize>,
}

impl FamilyForest {
    /// Constructs an empty forest
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new family with `term` as its root and returns the node index
    pub fn add_root(&mut self, term: TermId) -> usize {
        let idx = self.push(term);
        self.roots.push(idx);
        idx
    }

    /// Adds `term` as a child node of `parent` and returns the node index
    ///
    /// # Panics
    ///
    /// If `parent` is not a node of this forest
    pub fn add_child(&mut self, parent: usize, term: TermId) -> usize {
        let idx = self.push(term);
        self.nodes[parent].children.push(idx);
        idx
    }

    fn push(&mut self, term: TermId) -> usize {
        self.nodes.push(FamilyNode {
            term,
            children: Vec::new(),
        });
        self.nodes.len() - 1
    }

    /// Returns the node at the arena index
    pub fn node(&self, idx: usize) -> Option<&FamilyNode> {
        self.nodes.get(idx)
    }

    /// The number of families
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Returns `true` if the forest contains no family
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Iterates all families
    pub fn iter(&self) -> impl Iterator<Item = Family<'_>> {
        self.roots.iter().map(move |root| Family {
            forest: self,
            root: *root,
        })
    }

    /// Returns all terms of all families
    pub fn terms(&self) -> TermGroup {
        let mut terms = TermGroup::new();
        for family in self.iter() {
            terms.extend(family.terms());
        }
        terms
    }

    /// Discards every family whose terms are all part of another family
    ///
    /// Of two families with the same terms, the one created first is kept.
    /// Returns the number of discarded families.
    pub fn remove_subsumed(&mut self) -> usize {
        let term_sets: Vec<TermGroup> = self.iter().map(|family| family.terms()).collect();
        let keep: Vec<bool> = term_sets
            .iter()
            .enumerate()
            .map(|(i, family)| {
                !term_sets.iter().enumerate().any(|(j, other)| {
                    i != j
                        && family.is_subset(other)
                        && (other.len() > family.len() || j < i)
                })
            })
            .collect();
        let before = self.roots.len();
        let mut flags = keep.into_iter();
        self.roots.retain(|_| flags.next().unwrap_or(true));
        before - self.roots.len()
    }
}

/// A tree of related significant terms, a view into a [`FamilyForest`]
#[derive(Debug, Clone, Copy)]
pub struct Family<'a> {
    forest: &'a FamilyForest,
    root: usize,
}

impl<'a> Family<'a> {
    /// The term at the root of the family
    pub fn term(&self) -> TermId {
        self.forest.nodes[self.root].term
    }

    /// Returns `true` if the family consists of the root term only
    pub fn is_singleton(&self) -> bool {
        self.forest.nodes[self.root].children.is_empty()
    }

    /// Returns all terms of the family
    ///
    /// A term that is reached on several paths is listed once.
    pub fn terms(&self) -> TermGroup {
        let mut terms = TermGroup::new();
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            let node = &self.forest.nodes[idx];
            terms.insert(node.term);
            stack.extend(node.children.iter().copied());
        }
        terms
    }

    /// The number of distinct terms in the family
    pub fn len(&self) -> usize {
        self.terms().len()
    }

    /// Always `false`, every family has at least a root
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The direct child families
    pub fn children(&self) -> impl Iterator<Item = Family<'a>> + 'a {
        let forest = self.forest;
        forest.nodes[self.root]
            .children
            .iter()
            .map(move |idx| Family { forest, root: *idx })
    }
}
