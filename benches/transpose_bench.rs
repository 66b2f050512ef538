//! Transpose throughput across loop schedules.
//!
//! Run with: cargo bench --bench transpose_bench

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::time::Duration;
use transpose::matrix::{self, Matrices};
use transpose::schedule::{LoopShape, Schedule};

fn bench_schedule(c: &mut Criterion, group_name: &str, make: impl Fn() -> Schedule) {
    let mut group = c.benchmark_group(group_name);
    group.sample_size(10);
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(3));

    for order in [256, 1024, 2048] {
        let schedule = make();
        let mut m = Matrices::new(order).expect("order within bounds");
        matrix::initialize(&schedule, &mut m);

        group.throughput(Throughput::Bytes(m.bytes_per_transpose() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(order), &order, |bench, _| {
            bench.iter(|| matrix::transpose(&schedule, &mut m))
        });
    }
    group.finish();
}

fn bench_sequential(c: &mut Criterion) {
    bench_schedule(c, "seq_untiled", Schedule::sequential);
    bench_schedule(c, "seq_tiled_32", || {
        Schedule::sequential().with_tile(Some(32))
    });
    bench_schedule(c, "seq_nested_scalar", || {
        Schedule::sequential()
            .with_shape(LoopShape::Nested)
            .with_simd(false)
    });
}

#[cfg(feature = "parallel")]
fn bench_threaded(c: &mut Criterion) {
    use transpose::config::Threading;
    use transpose::schedule::Backend;

    for (name, threading) in [
        ("static_tiled_32", Threading::Static),
        ("stealing_tiled_32", Threading::WorkStealing),
    ] {
        bench_schedule(c, name, || {
            let backend = Backend::new(threading, None).expect("thread pool");
            Schedule::new(backend).with_tile(Some(32))
        });
    }
}

#[cfg(not(feature = "parallel"))]
fn bench_threaded(_: &mut Criterion) {}

criterion_group!(benches, bench_sequential, bench_threaded);
criterion_main!(benches);
