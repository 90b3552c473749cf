// SPDX-License-Identifier: PMPL-1.0-or-later
//! Performance benchmarks for query cache key construction

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::collections::HashMap;

use qcache_key::{BoundQuery, ParamValue, QueryKey, QueryKeyBuilder};

/// A query with `n` named placeholders, each bound to a small array.
fn named_query(n: usize) -> BoundQuery {
    let predicates: Vec<String> = (0..n).map(|i| format!("e.c{} in :p{}", i, i)).collect();
    let text = format!("select e from Entity e where {}", predicates.join(" and "));

    (0..n).fold(BoundQuery::new(text).with_max_rows(100), |q, i| {
        q.bind_named(
            format!("p{}", i),
            vec![ParamValue::Int(i as i64), ParamValue::from("x"), ParamValue::Null],
        )
    })
}

// ============================================================================
// Construction Benchmarks
// ============================================================================

fn bench_build(c: &mut Criterion) {
    let builder = QueryKeyBuilder::default();
    let mut group = c.benchmark_group("build");

    for n in [1usize, 8, 64].iter() {
        let source = named_query(*n);
        group.throughput(Throughput::Elements(*n as u64));
        group.bench_with_input(BenchmarkId::new("named", n), &source, |b, source| {
            b.iter(|| black_box(builder.build_from_source(source, true, false).unwrap()))
        });
    }

    let positional = (1..=16u32).fold(BoundQuery::new("select e from Entity e"), |q, i| {
        q.bind_positional(i, i64::from(i))
    });
    group.bench_function("positional_16", |b| {
        b.iter(|| black_box(builder.build_from_source(&positional, true, false).unwrap()))
    });

    group.finish();
}

// ============================================================================
// Comparison Benchmarks
// ============================================================================

fn bench_compare(c: &mut Criterion) {
    let builder = QueryKeyBuilder::default();
    let a = builder.build_from_source(&named_query(32), true, false).unwrap();
    let b_key = builder.build_from_source(&named_query(32), true, false).unwrap();

    let mut group = c.benchmark_group("compare");

    group.bench_function("equal_keys", |b| b.iter(|| black_box(a == b_key)));

    group.bench_function("fingerprint", |b| b.iter(|| black_box(a.fingerprint())));

    let mut cache: HashMap<QueryKey, usize> = HashMap::new();
    for n in 0..1000usize {
        let source = named_query(n % 16 + 1).with_first_row(n as u32);
        cache.insert(builder.build_from_source(&source, true, false).unwrap(), n);
    }
    group.bench_function("hash_map_lookup", |b| b.iter(|| black_box(cache.get(&a))));

    group.finish();
}

criterion_group!(build_benches, bench_build);

criterion_group!(compare_benches, bench_compare);

criterion_main!(build_benches, compare_benches);
