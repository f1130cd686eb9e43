//! A small ontology shared by unit tests
//!
//! ```text
//! MF  1 <- 60, 1 <- 61 <-regulates- 62 <-regulates- 63
//!     1 <- 64 <- 65, 60 <- 64, 60 <- 65, 61 <- 65
//!
//! BP  2 <- 10 <- 20 <- 30 (A) <- 31 (B) <- 33 (D)
//!                         30  <- 32 (C)
//!                         30  <-part_of- 34
//!     2 <- 11 <- 21 <- 40 (E) == 42
//!
//! CC  3 <- 50 <-part_of- 51 <-part_of- 52
//! ```

use crate::ontology::{Ontology, Property};
use crate::stats::TestResult;
use crate::{Branch, TermId};

pub const PART_OF: u32 = 1;
pub const REGULATES: u32 = 2;

const TERMS: [(u32, &str, Branch); 23] = [
    (1, "molecular_function", Branch::MolecularFunction),
    (2, "biological_process", Branch::BiologicalProcess),
    (3, "cellular_component", Branch::CellularComponent),
    (10, "cellular process", Branch::BiologicalProcess),
    (11, "metabolic process", Branch::BiologicalProcess),
    (20, "cell cycle", Branch::BiologicalProcess),
    (21, "catabolic process", Branch::BiologicalProcess),
    (30, "term A", Branch::BiologicalProcess),
    (31, "term B", Branch::BiologicalProcess),
    (32, "term C", Branch::BiologicalProcess),
    (33, "term D", Branch::BiologicalProcess),
    (34, "part of A", Branch::BiologicalProcess),
    (40, "term E", Branch::BiologicalProcess),
    (42, "term E equivalent", Branch::BiologicalProcess),
    (50, "organelle", Branch::CellularComponent),
    (51, "membrane", Branch::CellularComponent),
    (52, "membrane protein complex", Branch::CellularComponent),
    (60, "binding", Branch::MolecularFunction),
    (61, "catalytic activity", Branch::MolecularFunction),
    (62, "enzyme regulator", Branch::MolecularFunction),
    (63, "enzyme regulator regulator", Branch::MolecularFunction),
    (64, "transporter activity", Branch::MolecularFunction),
    (65, "transmembrane transporter", Branch::MolecularFunction),
];

const IS_A: [(u32, u32); 17] = [
    (10, 2),
    (11, 2),
    (20, 10),
    (21, 11),
    (30, 20),
    (31, 30),
    (32, 30),
    (33, 31),
    (40, 21),
    (50, 3),
    (60, 1),
    (61, 1),
    (64, 1),
    (65, 64),
    (64, 60),
    (65, 60),
    (65, 61),
];

pub fn ontology() -> Ontology {
    let mut builder = Ontology::builder();
    for (id, label, branch) in TERMS {
        builder.add_term(id, &format!("GO:{id:07}"), label, branch);
    }
    builder.add_property(PART_OF, "part_of", true);
    builder.add_property(REGULATES, "regulates", false);
    builder.set_root(Branch::MolecularFunction, 1u32).unwrap();
    builder.set_root(Branch::BiologicalProcess, 2u32).unwrap();
    builder.set_root(Branch::CellularComponent, 3u32).unwrap();

    let mut builder = builder.terms_complete();
    for (child, parent) in IS_A {
        builder
            .add_relationship(child, parent, 1, Property::IsA)
            .unwrap();
    }
    let part_of = Property::Named(PART_OF.into());
    let regulates = Property::Named(REGULATES.into());
    builder.add_relationship(34u32, 30u32, 1, part_of).unwrap();
    builder.add_relationship(51u32, 50u32, 1, part_of).unwrap();
    builder.add_relationship(52u32, 51u32, 1, part_of).unwrap();
    builder.add_relationship(62u32, 61u32, 1, regulates).unwrap();
    builder.add_relationship(63u32, 62u32, 1, regulates).unwrap();
    builder.add_relationship(42u32, 40u32, 0, Property::IsA).unwrap();

    builder.connect_all_terms().build().unwrap()
}

/// A ranked and corrected result with `(term, study_count, corrected)` rows
///
/// Raw and corrected p-values are identical, the study total is `10`.
pub fn test_result(branch: Branch, rows: &[(u32, usize, f64)]) -> TestResult {
    let mut result = TestResult::new(branch);
    for _ in 0..10 {
        result.increment_study_total();
    }
    for (term, count, corrected) in rows {
        let term = TermId::from(*term);
        for _ in 0..*count {
            result.increment_study_count(term);
        }
        result.set_pvalue(term, *corrected);
        result.set_corrected(term, *corrected);
    }
    result.rank();
    result
}
