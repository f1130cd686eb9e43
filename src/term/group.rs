use std::collections::HashSet;
use std::ops::{BitAnd, BitOr};

use crate::TermId;

/// A set of [`TermId`]s
///
/// Each term can occur only once in the group. The ids are kept sorted,
/// so iteration order is deterministic and lookups use binary search.
///
/// This group is used for ancestor and descendant sets, the annotations of
/// an entity and the neighbourhoods of a [`crate::family::FamilyTable`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TermGroup {
    ids: Vec<TermId>,
}

impl TermGroup {
    /// Constructs a new, empty [`TermGroup`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a new, empty [`TermGroup`] with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: Vec::with_capacity(capacity),
        }
    }

    /// Returns `true` if the group contains no [`TermId`]s
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the number of [`TermId`]s in the group
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Adds a new [`TermId`] to the group
    ///
    /// Returns whether the `TermId` was newly inserted.
    pub fn insert(&mut self, id: TermId) -> bool {
        match self.ids.binary_search(&id) {
            Ok(_) => false,
            Err(idx) => {
                self.ids.insert(idx, id);
                true
            }
        }
    }

    /// Removes the [`TermId`] from the group
    ///
    /// Returns whether the `TermId` was present
    pub fn remove(&mut self, id: &TermId) -> bool {
        match self.ids.binary_search(id) {
            Ok(idx) => {
                self.ids.remove(idx);
                true
            }
            Err(_) => false,
        }
    }

    /// Returns `true` if the group contains the [`TermId`]
    pub fn contains(&self, id: &TermId) -> bool {
        self.ids.binary_search(id).is_ok()
    }

    /// Returns `true` if every [`TermId`] of `self` is also in `other`
    pub fn is_subset(&self, other: &TermGroup) -> bool {
        self.len() <= other.len() && self.ids.iter().all(|id| other.contains(id))
    }

    /// Returns an Iterator of the [`TermId`]s inside the group
    pub fn iter(&self) -> TermIds<'_> {
        TermIds::new(self.ids.iter())
    }

    /// Returns the smallest [`TermId`] of the group
    pub fn first(&self) -> Option<TermId> {
        self.ids.first().copied()
    }

    /// Removes all [`TermId`]s that do not satisfy the predicate
    pub fn retain<F: FnMut(&TermId) -> bool>(&mut self, f: F) {
        self.ids.retain(f);
    }

    /// Adds a new [`TermId`] to the end of the group
    ///
    /// # Note
    ///
    /// This method does not check ordering or uniqueness, the caller
    /// must insert ids in ascending order
    fn insert_unchecked(&mut self, id: TermId) {
        self.ids.push(id);
    }
}

impl From<HashSet<TermId>> for TermGroup {
    fn from(s: HashSet<TermId>) -> Self {
        let mut ids: Vec<TermId> = s.into_iter().collect();
        ids.sort_unstable();
        Self { ids }
    }
}

impl From<Vec<TermId>> for TermGroup {
    fn from(mut ids: Vec<TermId>) -> Self {
        ids.sort_unstable();
        ids.dedup();
        Self { ids }
    }
}

impl FromIterator<TermId> for TermGroup {
    fn from_iter<T: IntoIterator<Item = TermId>>(iter: T) -> Self {
        TermGroup::from(iter.into_iter().collect::<Vec<TermId>>())
    }
}

impl Extend<TermId> for TermGroup {
    fn extend<T: IntoIterator<Item = TermId>>(&mut self, iter: T) {
        for id in iter {
            self.insert(id);
        }
    }
}

impl<'a> IntoIterator for &'a TermGroup {
    type Item = TermId;
    type IntoIter = TermIds<'a>;

    fn into_iter(self) -> TermIds<'a> {
        TermIds::new(self.ids.iter())
    }
}

impl IntoIterator for TermGroup {
    type Item = TermId;
    type IntoIter = std::vec::IntoIter<TermId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.into_iter()
    }
}

/// An iterator over [`TermId`]s
pub struct TermIds<'a> {
    inner: std::slice::Iter<'a, TermId>,
}

impl<'a> TermIds<'a> {
    fn new(inner: std::slice::Iter<'a, TermId>) -> Self {
        Self { inner }
    }
}

impl Iterator for TermIds<'_> {
    type Item = TermId;
    fn next(&mut self) -> Option<TermId> {
        self.inner.next().copied()
    }
}

impl BitOr for &TermGroup {
    type Output = TermGroup;

    fn bitor(self, rhs: &TermGroup) -> TermGroup {
        let mut group = TermGroup::with_capacity(self.len() + rhs.len());
        let (large, small) = if self.len() > rhs.len() {
            (self, rhs)
        } else {
            (rhs, self)
        };

        for id in &large.ids {
            group.insert_unchecked(*id);
        }
        for id in &small.ids {
            group.insert(*id);
        }
        group
    }
}

impl BitAnd for &TermGroup {
    type Output = TermGroup;

    fn bitand(self, rhs: &TermGroup) -> TermGroup {
        let mut group = TermGroup::with_capacity(self.len().min(rhs.len()));
        let (large, small) = if self.len() > rhs.len() {
            (self, rhs)
        } else {
            (rhs, self)
        };

        for id in &small.ids {
            if large.contains(id) {
                group.insert_unchecked(*id);
            }
        }
        group
    }
}
