//! Parse and validation benchmarks.
//!
//! ```bash
//! cargo bench
//! cargo bench validation
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use sql_config_validator::{
    Constraint, FeaturesLabelSelect, MustContainFrom, NoGroupByHaving, PlainColumnSelect,
    parse_query,
};

const QUERIES: &[(&str, &str)] = &[
    ("minimal", "SELECT * FROM t"),
    (
        "features_label",
        "SELECT {a, b, c IS NOT NULL AS has_c} AS features, d = 'yes' AS label FROM events",
    ),
    (
        "rejected_builtin",
        "SELECT a, b, c, sum(d, e) AS s FROM events WHERE a > 1",
    ),
];

fn wide_select(columns: usize) -> String {
    let list: Vec<String> = (0..columns).map(|i| format!("c{i}")).collect();
    format!("SELECT {} FROM t", list.join(", "))
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for (name, source) in QUERIES {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), source, |b, source| {
            b.iter(|| parse_query(black_box(source)))
        });
    }
    group.finish();
}

fn bench_validation(c: &mut Criterion) {
    let constraints: [&dyn Constraint; 4] = [
        &MustContainFrom,
        &NoGroupByHaving,
        &PlainColumnSelect,
        &FeaturesLabelSelect,
    ];

    let mut group = c.benchmark_group("validation");
    for (name, source) in QUERIES {
        let Ok(query) = parse_query(source) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::from_parameter(name), &query, |b, query| {
            b.iter(|| {
                constraints
                    .iter()
                    .try_for_each(|constraint| constraint.check(Some(black_box(query)), "q"))
            })
        });
    }

    for columns in [10, 100, 1000] {
        let Ok(query) = parse_query(&wide_select(columns)) else {
            continue;
        };
        group.throughput(Throughput::Elements(columns as u64));
        group.bench_with_input(
            BenchmarkId::new("plain_column_select", columns),
            &query,
            |b, query| b.iter(|| PlainColumnSelect.check(Some(black_box(query)), "q")),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_validation);
criterion_main!(benches);
