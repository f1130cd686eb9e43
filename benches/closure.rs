use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use goenrichment::ontology::{AllTerms, Builder, Property};
use goenrichment::{Branch, Ontology};

const PART_OF: u32 = 1;

/// A biological process branch of `layers` levels with `width` terms each
///
/// Every term is `is_a` two terms of the previous level, every third term
/// is also `part_of` a third one.
fn layered(layers: u32, width: u32) -> Builder<AllTerms> {
    let mut builder = Ontology::builder();
    builder.add_term(1u32, "GO:0008150", "biological_process", Branch::BiologicalProcess);
    builder.add_term(2u32, "GO:0003674", "molecular_function", Branch::MolecularFunction);
    builder.add_term(3u32, "GO:0005575", "cellular_component", Branch::CellularComponent);
    for layer in 0..layers {
        for i in 0..width {
            let id = 10 + layer * width + i;
            builder.add_term(
                id,
                &format!("GO:{id:07}"),
                &format!("term {layer}-{i}"),
                Branch::BiologicalProcess,
            );
        }
    }
    builder.add_property(PART_OF, "part_of", true);
    builder.set_root(Branch::BiologicalProcess, 1u32).unwrap();
    builder.set_root(Branch::MolecularFunction, 2u32).unwrap();
    builder.set_root(Branch::CellularComponent, 3u32).unwrap();

    let mut builder = builder.terms_complete();
    let part_of = Property::Named(PART_OF.into());
    for layer in 0..layers {
        for i in 0..width {
            let id = 10 + layer * width + i;
            if layer == 0 {
                builder.add_relationship(id, 1u32, 1, Property::IsA).unwrap();
                continue;
            }
            let previous = 10 + (layer - 1) * width;
            builder
                .add_relationship(id, previous + i, 1, Property::IsA)
                .unwrap();
            builder
                .add_relationship(id, previous + (i + 1) % width, 1, Property::IsA)
                .unwrap();
            if i % 3 == 0 {
                builder
                    .add_relationship(id, previous + (i + 2) % width, 1, part_of)
                    .unwrap();
            }
        }
    }
    builder
}

fn closure_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("closure");
    for (layers, width) in [(6u32, 20u32), (10, 40)] {
        group.bench_function(format!("{layers} layers x {width}"), |b| {
            b.iter_batched(
                || layered(layers, width),
                |builder| black_box(builder.connect_all_terms()),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn query_benchmark(c: &mut Criterion) {
    let ontology = layered(10, 40).connect_all_terms().build().unwrap();
    c.bench_function("information content", |b| {
        b.iter(|| {
            ontology
                .into_iter()
                .map(|term| black_box(term.information_content()))
                .sum::<f64>()
        })
    });
}

criterion_group!(benches, closure_benchmark, query_benchmark);
criterion_main!(benches);
