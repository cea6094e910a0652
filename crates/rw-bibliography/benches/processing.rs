//! Benchmarks for bibliography processing.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rw_bibliography::{BibliographyProcessor, ReferenceFinder};

/// Generate HTML with `paragraphs` paragraphs citing `distinct` works in rotation.
fn generate_document(paragraphs: usize, distinct: usize, with_list: bool) -> String {
    let mut html = String::with_capacity(paragraphs * 200);
    html.push_str("<h1>Document Title</h1>\n");

    for i in 0..paragraphs {
        let key = i % distinct;
        html.push_str(&format!(
            "<p>Paragraph {i} makes a claim <ref author=\"Author{key}, A.\" year=\"20{:02}\" title=\"Work {key}\">work{key}</ref> and continues.</p>\n",
            key % 100
        ));
    }

    if with_list {
        html.push_str("<h2>References</h2>\n<reflist style=\"Harvard\"/>\n");
    }
    html
}

fn bench_find(c: &mut Criterion) {
    let html = generate_document(500, 50, true);

    c.bench_function("find_500_references", |b| {
        b.iter(|| ReferenceFinder::find(&html));
    });
}

fn bench_no_markers(c: &mut Criterion) {
    let html = "<p>Plain paragraph without citations.</p>\n".repeat(1000);
    let processor = BibliographyProcessor::new();

    c.bench_function("process_without_markers", |b| {
        b.iter(|| processor.process(&html));
    });
}

fn bench_process_varying_sizes(c: &mut Criterion) {
    let processor = BibliographyProcessor::new();
    let mut group = c.benchmark_group("process_by_size");

    for (paragraphs, distinct) in [(10, 5), (100, 20), (1000, 200), (10_000, 1000)] {
        let html = generate_document(paragraphs, distinct, true);

        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("render", format!("{paragraphs}p_{distinct}k")),
            &html,
            |b, html| b.iter(|| processor.process(html)),
        );
    }

    group.finish();
}

fn bench_strip_without_list(c: &mut Criterion) {
    let html = generate_document(1000, 200, false);
    let processor = BibliographyProcessor::new();

    c.bench_function("strip_1000_references", |b| {
        b.iter(|| processor.process(&html));
    });
}

criterion_group!(
    benches,
    bench_find,
    bench_no_markers,
    bench_process_varying_sizes,
    bench_strip_without_list
);
criterion_main!(benches);
