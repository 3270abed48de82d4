//! Criterion benchmarks for whole-step throughput.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stour_bench::{random_distributions, reference_profile};
use stour_core::SiteIndex;
use stour_engine::StepDriver;

/// Benchmark: one full step of the 16³ reference box (4,096 sites).
fn bench_step_4k(c: &mut Criterion) {
    let mut driver = StepDriver::new(reference_profile()).unwrap();
    for (i, f) in random_distributions(4096, 42).into_iter().enumerate() {
        driver.seed_site(SiteIndex(i as u32), f);
    }

    c.bench_function("step_4k", |b| {
        b.iter(|| {
            driver.step().unwrap();
            black_box(driver.metrics());
        });
    });
}

/// Benchmark: 100 consecutive steps of the reference box.
fn bench_100_steps_4k(c: &mut Criterion) {
    c.bench_function("100_steps_4k", |b| {
        b.iter(|| {
            let mut driver = StepDriver::new(reference_profile()).unwrap();
            for _ in 0..100 {
                driver.step().unwrap();
            }
            black_box(driver.current_step());
        });
    });
}

criterion_group!(benches, bench_step_4k, bench_100_steps_4k);
criterion_main!(benches);
