use criterion::{criterion_group, criterion_main, Criterion};
use linhash::{Config, LinHashMap};
use rand::Rng;

fn insert_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert sequential");

    for item_count in [1_000u64, 100_000] {
        group.bench_function(format!("put {item_count} u64 keys"), |b| {
            b.iter(|| {
                let mut map = LinHashMap::new();
                for x in 0..item_count {
                    map.put(x, x * x).unwrap();
                }
                assert_eq!(item_count as usize, map.population());
            });
        });
    }
}

fn insert_bucket_capacity(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert by bucket capacity");
    group.sample_size(20);

    for slots in [2, 4, 16, 64] {
        group.bench_function(format!("put 100000 keys, {slots} slots"), |b| {
            b.iter(|| {
                let mut map = Config::new()
                    .bucket_capacity(slots)
                    .build::<u64, u64>()
                    .unwrap();

                for x in 0..100_000 {
                    map.put(x, x).unwrap();
                }
            });
        });
    }
}

fn get_hit(c: &mut Criterion) {
    let mut map = LinHashMap::new();

    for x in 0..1_000_000u64 {
        map.put(x, x).unwrap();
    }

    let mut rng = rand::rng();

    c.bench_function("get hit", |b| {
        b.iter(|| {
            let key = rng.random_range(0..1_000_000u64);
            assert_eq!(Some(&key), map.get(&key));
        });
    });
}

fn get_miss(c: &mut Criterion) {
    let mut map = LinHashMap::new();

    for x in 0..1_000_000u64 {
        map.put(x, x).unwrap();
    }

    c.bench_function("get miss", |b| {
        b.iter(|| {
            assert!(map.get(&2_000_000u64).is_none());
        });
    });
}

fn get_string(c: &mut Criterion) {
    let mut map = LinHashMap::new();

    map.put(String::from("abc_w5wa35aw35naw"), vec![1, 2, 3]).unwrap();

    for _ in 0..100_000 {
        map.put(format!("abc_{}", nanoid::nanoid!()), vec![]).unwrap();
    }

    c.bench_function("get string", |b| {
        b.iter(|| {
            assert_eq!(
                [1, 2, 3],
                &**map.get("abc_w5wa35aw35naw").unwrap(),
            );
        });
    });
}

fn full_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan all");

    for item_count in [10_000u64, 1_000_000] {
        let mut map = LinHashMap::new();
        for x in 0..item_count {
            map.put(x, ()).unwrap();
        }

        group.bench_function(format!("scan all, {item_count} items"), |b| {
            b.iter(|| {
                assert_eq!(item_count as usize, map.entries().count());
            });
        });
    }
}

criterion_group!(
    benches,
    insert_sequential,
    insert_bucket_capacity,
    get_hit,
    get_miss,
    get_string,
    full_scan
);
criterion_main!(benches);
