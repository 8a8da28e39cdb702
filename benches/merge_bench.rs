use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use boolq::query::compiler::{Comparison, Condition, Expr, QueryCompiler};
use boolq::query::merge::{reduce_all, MergeOp};
use boolq::query::nodes::RangeQuery;
use boolq::query::types::ValueType;
use boolq::{FieldMapping, FieldType, IndexMapping, QueryNode};

fn long() -> ValueType {
    ValueType::new(FieldType::Long)
}

/// Disjoint ranges, with every third one bridging its two neighbours
fn make_ranges(count: usize) -> Vec<QueryNode> {
    (0..count as i64)
        .map(|i| {
            let (lower, upper) = if i % 3 == 2 {
                (i * 10 - 15, i * 10 - 5)
            } else {
                (i * 10, i * 10 + 4)
            };
            RangeQuery::new("x", long()).gt(lower).lt(upper).into()
        })
        .collect()
}

fn make_expr(count: usize) -> Expr {
    let children = (0..count)
        .map(|i| {
            let lower = (i * 10).to_string();
            let upper = (i * 10 + 7).to_string();
            Expr::and(vec![
                Condition::new("x", Comparison::Gt, [lower]).into(),
                Condition::new("x", Comparison::Lt, [upper]).into(),
                Condition::eq("status", "active").into(),
            ])
        })
        .collect();
    Expr::or(children)
}

fn bench_reduce(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce_union");
    for &count in &[8usize, 64, 256] {
        let ranges = make_ranges(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &ranges, |b, ranges| {
            b.iter(|| {
                let reduced = reduce_all(black_box(ranges.clone()), MergeOp::Union).unwrap();
                black_box(reduced.len())
            })
        });
    }
    group.finish();
}

fn bench_compile(c: &mut Criterion) {
    let mapping = IndexMapping::new()
        .field("x", FieldMapping::long())
        .field("status", FieldMapping::keyword());
    let compiler = QueryCompiler::new(mapping);

    let mut group = c.benchmark_group("compile_render");
    for &count in &[4usize, 32, 128] {
        let expr = make_expr(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &expr, |b, expr| {
            b.iter(|| black_box(compiler.compile_to_document(black_box(expr)).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_reduce, bench_compile);
criterion_main!(benches);
