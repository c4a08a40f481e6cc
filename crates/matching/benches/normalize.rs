//! Benchmarks for text normalization and matching.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mydna_matching::{clean, extract_candidates, normalize, scan, shared_across, ReferenceLists};

const LABEL: &str = "INGREDIENTS: Enriched Wheat Flour (wheat flour, niacin, reduced iron),\n\
    Sugar, Soybean Oil, Corn Syrup, Salt, Leavening (baking soda, calcium phosphate),\n\
    Soy Lecithin, Natural Flavor. CONTAINS: WHEAT, SOY. May contain milk & eggs!";

fn create_label(repeat: usize) -> String {
    (0..repeat).map(|_| LABEL).collect::<Vec<_>>().join("\n")
}

fn bench_clean(c: &mut Criterion) {
    let mut group = c.benchmark_group("clean");

    for size in [1, 10, 100].iter() {
        let text = create_label(*size);
        group.bench_with_input(BenchmarkId::new("label", size), size, |b, _| {
            b.iter(|| clean(black_box(text.as_str())))
        });
    }

    group.finish();
}

fn bench_extract(c: &mut Criterion) {
    let text = create_label(10);
    c.bench_function("extract_candidates", |b| {
        b.iter(|| extract_candidates(black_box(text.as_str())))
    });
}

fn bench_scan(c: &mut Criterion) {
    let tokens = normalize(&create_label(10));
    let reference = ["wheat", "soy lecithin", "corn syrup", "milk", "eggs"];

    c.bench_function("scan", |b| {
        b.iter(|| scan(black_box(tokens.as_slice()), black_box(&reference[..])))
    });
}

fn bench_shared(c: &mut Criterion) {
    let profiles: ReferenceLists = (0..20)
        .map(|i| {
            let items: Vec<String> = (0..200).map(|j| format!("item{}", (i + j) % 250)).collect();
            (format!("profile{i}"), items)
        })
        .collect();

    c.bench_function("shared_across", |b| {
        b.iter(|| shared_across(black_box(&profiles)))
    });
}

criterion_group!(benches, bench_clean, bench_extract, bench_scan, bench_shared);
criterion_main!(benches);
