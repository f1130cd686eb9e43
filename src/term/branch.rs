use std::fmt::Display;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use crate::GoError;

/// One of the three top-level categories of the Gene Ontology
///
/// Every term belongs to exactly one branch and every branch has a single
/// root term. Enrichment is computed independently per branch.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Branch {
    /// `molecular_function`, `MF`, `F`
    MolecularFunction,
    /// `biological_process`, `BP`, `P`
    BiologicalProcess,
    /// `cellular_component`, `CC`, `C`
    CellularComponent,
}

impl Branch {
    /// All branches, in their canonical order
    pub const ALL: [Branch; 3] = [
        Branch::MolecularFunction,
        Branch::BiologicalProcess,
        Branch::CellularComponent,
    ];

    /// Returns the OBO namespace of the branch, e.g. `biological_process`
    pub fn label(&self) -> &'static str {
        match self {
            Branch::MolecularFunction => "molecular_function",
            Branch::BiologicalProcess => "biological_process",
            Branch::CellularComponent => "cellular_component",
        }
    }

    /// Returns the two-letter acronym of the branch, e.g. `BP`
    pub fn acronym(&self) -> &'static str {
        match self {
            Branch::MolecularFunction => "MF",
            Branch::BiologicalProcess => "BP",
            Branch::CellularComponent => "CC",
        }
    }

    /// Returns the one-letter aspect code used in GAF files, e.g. `P`
    pub fn code(&self) -> &'static str {
        match self {
            Branch::MolecularFunction => "F",
            Branch::BiologicalProcess => "P",
            Branch::CellularComponent => "C",
        }
    }

    fn index(self) -> usize {
        match self {
            Branch::MolecularFunction => 0,
            Branch::BiologicalProcess => 1,
            Branch::CellularComponent => 2,
        }
    }
}

impl FromStr for Branch {
    type Err = GoError;

    /// Parses the namespace label, the acronym or the aspect code
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Branch::ALL
            .into_iter()
            .find(|branch| s == branch.label() || s == branch.acronym() || s == branch.code())
            .ok_or_else(|| GoError::UnknownBranch(s.to_string()))
    }
}

impl Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A fixed-size container holding one value per [`Branch`]
///
/// # Examples
///
/// ```
/// use goenrichment::{Branch, PerBranch};
///
/// let mut counts: PerBranch<usize> = PerBranch::default();
/// counts[Branch::CellularComponent] += 3;
///
/// assert_eq!(counts[Branch::CellularComponent], 3);
/// assert_eq!(counts[Branch::MolecularFunction], 0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PerBranch<T> {
    inner: [T; 3],
}

impl<T> PerBranch<T> {
    /// Constructs a new `PerBranch` by calling `f` once for every branch
    pub fn from_fn<F: FnMut(Branch) -> T>(mut f: F) -> Self {
        Self {
            inner: Branch::ALL.map(&mut f),
        }
    }

    /// Returns an iterator of all branches and their values
    pub fn iter(&self) -> impl Iterator<Item = (Branch, &T)> {
        Branch::ALL.into_iter().zip(self.inner.iter())
    }

    /// Returns an iterator of all branches and mutable references to their values
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Branch, &mut T)> {
        Branch::ALL.into_iter().zip(self.inner.iter_mut())
    }

    /// Maps every value into a new `PerBranch`
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PerBranch<U> {
        PerBranch {
            inner: self.inner.map(f),
        }
    }
}

impl<T> From<[T; 3]> for PerBranch<T> {
    /// Values in the order of [`Branch::ALL`]
    fn from(inner: [T; 3]) -> Self {
        Self { inner }
    }
}

impl<T> Index<Branch> for PerBranch<T> {
    type Output = T;
    fn index(&self, branch: Branch) -> &T {
        &self.inner[branch.index()]
    }
}

impl<T> IndexMut<Branch> for PerBranch<T> {
    fn index_mut(&mut self, branch: Branch) -> &mut T {
        &mut self.inner[branch.index()]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_branch() {
        assert_eq!(
            "biological_process".parse::<Branch>().unwrap(),
            Branch::BiologicalProcess
        );
        assert_eq!("MF".parse::<Branch>().unwrap(), Branch::MolecularFunction);
        assert_eq!("C".parse::<Branch>().unwrap(), Branch::CellularComponent);
        assert_eq!(
            "cellular".parse::<Branch>(),
            Err(GoError::UnknownBranch("cellular".to_string()))
        );
    }

    #[test]
    fn per_branch_from_fn() {
        let labels = PerBranch::from_fn(|b| b.acronym());
        let collected: Vec<_> = labels.iter().map(|(_, l)| *l).collect();
        assert_eq!(collected, vec!["MF", "BP", "CC"]);
    }

    #[test]
    fn per_branch_map() {
        let mut counts = PerBranch::from_fn(|_| 1usize);
        counts[Branch::BiologicalProcess] = 5;
        let doubled = counts.map(|c| c * 2);
        assert_eq!(doubled[Branch::BiologicalProcess], 10);
        assert_eq!(doubled[Branch::MolecularFunction], 2);
    }
}
