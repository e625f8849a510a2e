use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rwsql::{Db, DbConfig, Query};

/// Build a chain with `n` selected columns and `n` equality predicates.
fn build_select(db: &Db, n: usize) -> Query<'_> {
    let mut query = db.table("t");
    for i in 0..n {
        let col = format!("col{i}");
        query = query.select(&[col.as_str()]).eq(&col, i as i64);
    }
    query
}

fn bench_render_select(c: &mut Criterion) {
    let db = Db::new(DbConfig::new());
    let mut group = c.benchmark_group("render/select");

    for n in [1, 5, 10, 50, 100] {
        let query = build_select(&db, n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &query, |b, query| {
            b.iter(|| black_box(query.select_statement().unwrap()));
        });
    }

    group.finish();
}

fn bench_render_update(c: &mut Criterion) {
    let db = Db::new(DbConfig::new());
    let mut group = c.benchmark_group("render/update");

    for n in [1, 5, 10, 50] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let mut query = db.table("t").eq("id", 1);
                for i in 0..n {
                    query = query.set(&format!("col{i}"), i as i64);
                }
                black_box(query.update_statement().unwrap());
            });
        });
    }

    group.finish();
}

fn bench_render_in_list(c: &mut Criterion) {
    let db = Db::new(DbConfig::new());
    let mut group = c.benchmark_group("render/in_list");

    for n in [5, 20, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| {
                let query = db.table("t").in_list("id", values.clone());
                black_box(query.select_statement().unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_render_select, bench_render_update, bench_render_in_list);
criterion_main!(benches);
