use criterion::{criterion_group, criterion_main, Criterion};
use esox_resourcepool::{AcquireTimeout, ResourcePool};
use std::hint::black_box;
use std::thread;

fn uncontended(c: &mut Criterion) {
    let pool: ResourcePool<u64, &str> = ResourcePool::new(|| 0, 8).unwrap();

    c.bench_function("acquire_release_uncontended", |b| {
        b.iter(|| {
            let mut conn = pool.acquire(AcquireTimeout::Immediate, "bench").unwrap();
            *conn += 1;
            black_box(conn.id());
        })
    });
}

fn contended(c: &mut Criterion) {
    let pool: ResourcePool<u64, usize> = ResourcePool::new(|| 0, 2).unwrap();

    c.bench_function("acquire_release_4_threads_2_resources", |b| {
        b.iter(|| {
            thread::scope(|scope| {
                for worker in 0..4 {
                    let pool = &pool;
                    scope.spawn(move || {
                        for _ in 0..100 {
                            let mut conn = pool.acquire(AcquireTimeout::Unbounded, worker).unwrap();
                            *conn += 1;
                        }
                    });
                }
            });
        })
    });
}

criterion_group!(benches, uncontended, contended);
criterion_main!(benches);
