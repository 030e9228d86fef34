use atomic_bitset::ConcurrentBitmap;
use codspeed_criterion_compat::{black_box, criterion_group, criterion_main, Criterion};

const BITS: usize = 1 << 16;

fn bench_point_ops(c: &mut Criterion) {
    let bitmap = ConcurrentBitmap::new(BITS);

    c.bench_function("bitmap_set_unset", |b| {
        b.iter(|| {
            let i = black_box(4097);
            bitmap.set(i).expect("index in range");
            bitmap.unset(i).expect("index in range");
        })
    });

    c.bench_function("bitmap_is_set", |b| {
        b.iter(|| black_box(bitmap.is_set(black_box(4097)).expect("index in range")))
    });
}

fn bench_aggregates(c: &mut Criterion) {
    let bitmap = ConcurrentBitmap::new(BITS);
    for i in (0..BITS).step_by(5) {
        bitmap.set(i).expect("index in range");
    }

    c.bench_function("bitmap_count_64k", |b| b.iter(|| black_box(bitmap.count())));

    c.bench_function("bitmap_to_vec_64k", |b| {
        b.iter(|| {
            let ones = bitmap.to_vec();
            black_box(ones);
        })
    });

    c.bench_function("bitmap_clear_64k", |b| b.iter(|| bitmap.clear()));
}

criterion_group!(benches, bench_point_ops, bench_aggregates);
criterion_main!(benches);
