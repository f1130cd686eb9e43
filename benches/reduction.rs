use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use goenrichment::enrichment::RelationPolicy;
use goenrichment::family::FamilyTable;
use goenrichment::ontology::Property;
use goenrichment::stats::hypergeom::Hypergeometric;
use goenrichment::stats::{Correction, TestResult};
use goenrichment::{Branch, Ontology, TermId};

/// A binary tree of `depth` levels below the biological process root
fn tree(depth: u32) -> Ontology {
    let mut builder = Ontology::builder();
    builder.add_term(1u32, "GO:0008150", "biological_process", Branch::BiologicalProcess);
    builder.add_term(2u32, "GO:0003674", "molecular_function", Branch::MolecularFunction);
    builder.add_term(3u32, "GO:0005575", "cellular_component", Branch::CellularComponent);
    // heap numbering: node h has children 2h and 2h + 1, stored as id h + 3
    let nodes = (1u32 << (depth + 1)) - 1;
    for h in 1..=nodes {
        let id = h + 3;
        builder.add_term(id, &format!("GO:{id:07}"), "term", Branch::BiologicalProcess);
    }
    builder.set_root(Branch::BiologicalProcess, 1u32).unwrap();
    builder.set_root(Branch::MolecularFunction, 2u32).unwrap();
    builder.set_root(Branch::CellularComponent, 3u32).unwrap();

    let mut builder = builder.terms_complete();
    builder.add_relationship(4u32, 1u32, 1, Property::IsA).unwrap();
    for h in 2..=nodes {
        builder
            .add_relationship(h + 3, h / 2 + 3, 1, Property::IsA)
            .unwrap();
    }
    builder.connect_all_terms().build().unwrap()
}

fn reduction_benchmark(c: &mut Criterion) {
    let ontology = tree(7);
    let result = TestResult::new(Branch::BiologicalProcess);
    let terms: Vec<TermId> = ontology
        .descendants(ontology.root(Branch::BiologicalProcess), None, None)
        .into_iter()
        .collect();

    c.bench_function(&format!("family table {} terms", terms.len()), |b| {
        b.iter_batched(
            || {
                let mut table = FamilyTable::new(&ontology, &result, RelationPolicy::IsAOnly);
                for term in &terms {
                    let score = f64::from(term.as_u32() % 17) + 1.0;
                    table.add_with_score(*term, score);
                }
                table
            },
            |table| black_box(table.count()),
            BatchSize::SmallInput,
        )
    });
}

fn statistics_benchmark(c: &mut Criterion) {
    c.bench_function("hypergeometric upper tail", |b| {
        let mut hyper = Hypergeometric::new();
        b.iter(|| {
            (0..100usize)
                .map(|k| hyper.upper_tail(black_box(k), 200, 400, 20_000))
                .sum::<f64>()
        })
    });

    let pvalues: Vec<f64> = (1..=5000).map(|i| f64::from(i) / 5000.0).collect();
    c.bench_function("benjamini-hochberg 5000", |b| {
        b.iter(|| Correction::BenjaminiHochberg.correct(black_box(&pvalues)))
    });
}

criterion_group!(benches, reduction_benchmark, statistics_benchmark);
criterion_main!(benches);
