use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlreq::{Filter, Query, SqlCommand, insert, select};

/// Build a SELECT over `n` fields filtered by `n` AND-combined comparisons:
/// SELECT col0, ... FROM t WHERE col0 = @col0 AND col1 = @col1 ...
fn build_select(n: usize) -> Query {
    let fields: Vec<String> = (0..n).map(|i| format!("col{i}")).collect();
    let filters: Vec<Filter> = (0..n)
        .map(|i| Filter::eq(format!("col{i}"), i as i64))
        .collect();
    Query::from(select("t").fields(fields).filter(Filter::and(filters)))
}

fn build_insert(n: usize) -> Query {
    let mut query = insert("t");
    for i in 0..n {
        query = query.set(format!("col{i}"), i as i64);
    }
    Query::from(query)
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/render");

    for n in [1, 5, 10, 50, 100] {
        let query = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &query, |b, query| {
            b.iter(|| black_box(query.sql_query().unwrap()));
        });
    }

    group.finish();
}

fn bench_build_command(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/build_command");

    for n in [1, 5, 10, 50, 100] {
        let query = build_insert(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &query, |b, query| {
            b.iter(|| {
                let command = SqlCommand::build(query).unwrap();
                black_box(command.to_positional());
            });
        });
    }

    group.finish();
}

fn bench_collect_parameters(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/collect_parameters");

    for n in [5, 20, 100, 500] {
        let query = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &query, |b, query| {
            b.iter(|| black_box(query.parameters()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_render,
    bench_build_command,
    bench_collect_parameters
);
criterion_main!(benches);
