//! Benchmarks for the matching engine.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sbom_consistency::matching::comparators::{
    longest_common_substring_consistency_score, text_consistency, version_consistency,
};
use sbom_consistency::matching::{NameKind, NameMatcher};
use sbom_consistency::model::{FieldValue, Record, RecordSet};
use std::hint::black_box;

fn package_set(count: usize, prefix: &str) -> RecordSet {
    (0..count).fold(RecordSet::new(), |set, i| {
        set.with(
            format!("SPDXRef-Package-{i}"),
            Record::new()
                .with("name", format!("{prefix}package-{i}").as_str())
                .with("versionInfo", format!("1.{}.{}", i % 10, i % 7).as_str()),
        )
    })
}

fn benchmark_name_matcher(c: &mut Criterion) {
    let mut group = c.benchmark_group("name_matcher");
    let matcher = NameMatcher::new("name", NameKind::Package);
    for size in [100, 1_000, 10_000] {
        let left = package_set(size, "pkg:npm/");
        let right = package_set(size, "npm:");
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| matcher.match_sets(black_box(&left), black_box(&right)));
        });
    }
    group.finish();
}

fn benchmark_comparators(c: &mut Criterion) {
    let purl_a = FieldValue::from("pkg:npm/%40angular/core@17.0.1");
    let purl_b = FieldValue::from("pkg:npm/@angular/core@17.0.0");
    let author_a = FieldValue::from("Organization: Angular Team");
    let author_b = FieldValue::from("angular");
    let version_a = FieldValue::from("v17.0.1");
    let version_b = FieldValue::from("17.0.0-rc.1");

    c.bench_function("substring_purl", |b| {
        b.iter(|| longest_common_substring_consistency_score(black_box(&purl_a), black_box(&purl_b)));
    });
    c.bench_function("text_author", |b| {
        b.iter(|| text_consistency(black_box(&author_a), black_box(&author_b)));
    });
    c.bench_function("version", |b| {
        b.iter(|| version_consistency(black_box(&version_a), black_box(&version_b)));
    });
}

criterion_group!(benches, benchmark_name_matcher, benchmark_comparators);
criterion_main!(benches);
