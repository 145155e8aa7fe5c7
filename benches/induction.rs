//! Benchmarks for schema induction.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use kg2sql::config::ConversionConfig;
use kg2sql::induce::induce;
use kg2sql::persist::{MemoryPersister, Persister};
use kg2sql::triple::RawTriple;

const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// Authors writing articles that carry tags: one 1:N and one N:M relation.
fn synthetic_graph(authors: usize, articles_per_author: usize, tags: usize) -> Vec<RawTriple> {
    let mut triples = Vec::new();
    for t in 0..tags {
        triples.push(RawTriple::link(format!("tag{t}"), RDF_TYPE, "Tag"));
        triples.push(RawTriple::literal(format!("tag{t}"), "name", format!("tag {t}")));
    }
    for a in 0..authors {
        let author = format!("author{a}");
        triples.push(RawTriple::link(&author, RDF_TYPE, "Person"));
        triples.push(RawTriple::literal(&author, "born", format!("{}", 1900 + a % 100)));
        for n in 0..articles_per_author {
            let article = format!("article{a}_{n}");
            triples.push(RawTriple::link(&article, RDF_TYPE, "Article"));
            triples.push(RawTriple::literal(&article, "pages", format!("{}", 3 + n)));
            triples.push(RawTriple::link(&author, "hasWritten", &article));
            triples.push(RawTriple::link(&article, "tagged", format!("tag{}", n % tags)));
            triples.push(RawTriple::link(
                &article,
                "tagged",
                format!("tag{}", (n + a) % tags),
            ));
        }
    }
    triples
}

fn bench_induce(c: &mut Criterion) {
    let triples = synthetic_graph(200, 10, 25);
    let config = ConversionConfig::default();

    c.bench_function("induce_2k_articles", |bench| {
        bench.iter(|| black_box(induce(&triples, &config).unwrap()))
    });
}

fn bench_render(c: &mut Criterion) {
    let triples = synthetic_graph(200, 10, 25);
    let schema = induce(&triples, &ConversionConfig::default()).unwrap();

    c.bench_function("render_statements_2k_articles", |bench| {
        bench.iter(|| {
            let mut persister = MemoryPersister::default();
            black_box(persister.persist(&schema.tables).unwrap())
        })
    });
}

criterion_group!(benches, bench_induce, bench_render);
criterion_main!(benches);
