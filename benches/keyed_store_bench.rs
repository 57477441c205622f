use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use social_graph::{murmur3_32, KeyedStore};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn bench_put_fresh_100k(c: &mut Criterion) {
    let keys: Vec<_> = lcg(1).take(100_000).map(key).collect();
    c.bench_function("store::put_fresh_100k", |b| {
        b.iter_batched(
            KeyedStore::<u64>::new,
            |mut m| {
                for (i, k) in keys.iter().enumerate() {
                    m.put(k, i as u64).unwrap();
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit(c: &mut Criterion) {
    c.bench_function("store::get_hit", |b| {
        let mut m = KeyedStore::new();
        let keys: Vec<_> = lcg(7).take(20_000).map(key).collect();
        for (i, k) in keys.iter().enumerate() {
            m.put(k, i as u64).unwrap();
        }
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(m.get(k));
        })
    });
}

fn bench_get_miss(c: &mut Criterion) {
    c.bench_function("store::get_miss", |b| {
        let mut m = KeyedStore::new();
        for (i, x) in lcg(11).take(10_000).enumerate() {
            m.put(&key(x), i as u64).unwrap();
        }
        let misses: Vec<_> = lcg(0xdead_beef).take(4_096).map(key).collect();
        let mut it = misses.iter().cycle();
        b.iter(|| black_box(m.get(it.next().unwrap())))
    });
}

fn bench_put_duplicate(c: &mut Criterion) {
    c.bench_function("store::put_duplicate", |b| {
        let mut m = KeyedStore::new();
        m.put("dup", 0u64).unwrap();
        b.iter(|| black_box(m.put("dup", 1).is_err()))
    });
}

fn bench_murmur_short_key(c: &mut Criterion) {
    c.bench_function("murmur3_32::short_key", |b| {
        b.iter(|| black_box(murmur3_32(black_box(b"k00000000deadbeef"), 0)))
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_put_fresh_100k, bench_get_hit, bench_get_miss, bench_put_duplicate, bench_murmur_short_key
}
criterion_main!(benches);
