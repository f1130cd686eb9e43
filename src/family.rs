//! Redundancy reduction of enriched terms
//!
//! Significant terms of one branch are grouped into families: trees of
//! terms that descend from each other via `is_a`. Within each family, a
//! [`FamilyTable`] greedily selects a small set of representative terms
//! that covers the family. The result can then be filtered down to the
//! representatives and all significant terms outside of any family.
//!
//! ```text
//! TestResult -> build_families -> FamilyForest
//!            -> representatives (FamilyTable per family) -> TermGroup
//!            -> filter -> filtered TestResult
//! ```

mod builder;
mod filter;
mod forest;
mod table;

pub use builder::build_families;
pub use filter::{filter, representatives};
pub use forest::{Family, FamilyForest, FamilyNode};
pub use table::FamilyTable;
