//! Benchmarks comparing the two ordered-unique backings.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tessella_collections::{OrderedUnique, PosSet, VecSet};

fn bench_push(c: &mut Criterion) {
    c.bench_function("vec_set_push_10k", |b| {
        b.iter(|| {
            let mut set = VecSet::with_capacity(10_000);
            for i in 0..10_000 {
                set.push(black_box(i)).unwrap();
            }
            set
        })
    });

    c.bench_function("pos_set_push_10k", |b| {
        b.iter(|| {
            let mut set = PosSet::with_capacity(10_000);
            for i in 0..10_000 {
                set.push(black_box(i)).unwrap();
            }
            set
        })
    });
}

fn bench_index_of(c: &mut Criterion) {
    let vec_set = VecSet::dedup_from(0..10_000);
    let pos_set = PosSet::dedup_from(0..10_000);

    c.bench_function("vec_set_index_of", |b| {
        b.iter(|| vec_set.index_of(black_box(&9_999)))
    });

    c.bench_function("pos_set_index_of", |b| {
        b.iter(|| pos_set.index_of(black_box(&9_999)))
    });
}

fn bench_positional_insert(c: &mut Criterion) {
    c.bench_function("vec_set_insert_front_1k", |b| {
        b.iter(|| {
            let mut set = VecSet::with_capacity(1_000);
            for i in 0..1_000 {
                set.insert(0, black_box(i)).unwrap();
            }
            set
        })
    });

    c.bench_function("pos_set_insert_front_1k", |b| {
        b.iter(|| {
            let mut set = PosSet::with_capacity(1_000);
            for i in 0..1_000 {
                set.insert(0, black_box(i)).unwrap();
            }
            set
        })
    });
}

criterion_group!(benches, bench_push, bench_index_of, bench_positional_insert);
criterion_main!(benches);
