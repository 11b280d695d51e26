use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use flakegen::{
    AtomicIdGenerator, IdGenStatus, IdGenerator, SnowflakeGenerator, TimeSource, WallClock,
};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

struct FixedMockTime {
    millis: u64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded). One full millisecond worth of sequence values.
const TOTAL_IDS: usize = 4096;

/// Benchmarks a hot-path generator where IDs are always `Ready`.
fn bench_generator<G>(c: &mut Criterion, group_name: &str, generator_factory: impl Fn() -> G)
where
    G: SnowflakeGenerator,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator_factory();
                for _ in 0..TOTAL_IDS {
                    match generator.try_poll_id() {
                        Ok(IdGenStatus::Ready { id }) => {
                            black_box(id);
                        }
                        Ok(IdGenStatus::Pending { .. }) | Err(_) => unreachable!(),
                    }
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks generators against the wall clock, including the busy-wait on an
/// exhausted millisecond.
fn bench_generator_wall_clock<G>(
    c: &mut Criterion,
    group_name: &str,
    generator_factory: impl Fn() -> G,
) where
    G: SnowflakeGenerator,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        let generator = generator_factory();
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                black_box(generator.next_id().expect("clock moved backward"));
            }
        });
    });

    group.finish();
}

/// Benchmarks a shared generator under contention.
fn bench_generator_threaded<G>(
    c: &mut Criterion,
    group_name: &str,
    generator_factory: impl Fn() -> G,
) where
    G: SnowflakeGenerator + Send + Sync,
{
    let threads = num_cpus::get().clamp(2, 8);
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements((TOTAL_IDS * threads) as u64));

    group.bench_function(format!("threads/{threads}/elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let generator = Arc::new(generator_factory());
            let barrier = Arc::new(Barrier::new(threads + 1));

            scope(|s| {
                for _ in 0..threads {
                    let generator = Arc::clone(&generator);
                    let barrier = Arc::clone(&barrier);
                    s.spawn(move || {
                        barrier.wait();
                        for _ in 0..iters {
                            for _ in 0..TOTAL_IDS {
                                black_box(generator.next_id().expect("clock moved backward"));
                            }
                        }
                    });
                }

                barrier.wait();
                Instant::now()
            })
            .elapsed()
        });
    });

    group.finish();
}

fn benchmark_mock(c: &mut Criterion) {
    bench_generator(c, "mock/lock", || {
        IdGenerator::with_time(0, 0, FixedMockTime { millis: 1 }).expect("valid ids")
    });
    bench_generator(c, "mock/atomic", || {
        AtomicIdGenerator::with_time(0, 0, FixedMockTime { millis: 1 }).expect("valid ids")
    });
}

fn benchmark_wall_clock(c: &mut Criterion) {
    bench_generator_wall_clock(c, "wall/lock", || {
        IdGenerator::with_time(0, 0, WallClock::new()).expect("valid ids")
    });
    bench_generator_wall_clock(c, "wall/atomic", || {
        AtomicIdGenerator::with_time(0, 0, WallClock::new()).expect("valid ids")
    });
}

fn benchmark_threaded(c: &mut Criterion) {
    bench_generator_threaded(c, "threaded/lock", || {
        IdGenerator::new(0, 0).expect("valid ids")
    });
    bench_generator_threaded(c, "threaded/atomic", || {
        AtomicIdGenerator::new(0, 0).expect("valid ids")
    });
}

criterion_group!(benches, benchmark_mock, benchmark_wall_clock, benchmark_threaded);
criterion_main!(benches);
