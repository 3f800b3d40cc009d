//! Benchmarks for hotcode profiles
//!
//! Run with: cargo bench

use std::sync::Arc;
use std::thread;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use hotcode::config::SamplingConfig;
use hotcode::profile::{SharedProfile, TopKProfile};
use hotcode::report::Reporter;

/// Method-like keys; a few hot ones and a long tail
fn method_keys(n: usize, distinct: u64) -> Vec<Arc<str>> {
    let names: Vec<Arc<str>> = (0..distinct)
        .map(|i| Arc::from(format!("com.example.Service{}.handle(Ljava/lang/Object;)V", i)))
        .collect();
    (0..n as u64)
        .map(|i| {
            let idx = if i % 4 == 0 { i % 8 } else { (i * 2_654_435_761) % distinct };
            Arc::clone(&names[idx as usize])
        })
        .collect()
}

// ============================================================================
// TopKProfile Benchmarks
// ============================================================================

fn bench_top_k_profile(c: &mut Criterion) {
    let mut group = c.benchmark_group("top_k_profile");
    group.throughput(Throughput::Elements(1));

    for distinct in [100, 10_000] {
        group.bench_function(format!("record_d{}", distinct), |b| {
            let keys = method_keys(100_000, distinct);
            let mut profile = TopKProfile::new();
            let mut i = 0usize;
            b.iter(|| {
                black_box(profile.record(Arc::clone(&keys[i % keys.len()])));
                i = i.wrapping_add(1);
            });
        });
    }

    for k in [10, 100] {
        group.bench_function(format!("top_k{}", k), |b| {
            let profile: TopKProfile<Arc<str>> = method_keys(100_000, 10_000).into_iter().collect();
            b.iter(|| black_box(profile.top_k_entries(black_box(k)).unwrap()));
        });
    }

    group.finish();
}

// ============================================================================
// SharedProfile Benchmarks
// ============================================================================

fn bench_shared_profile(c: &mut Criterion) {
    let mut group = c.benchmark_group("shared_profile");
    group.throughput(Throughput::Elements(1));

    group.bench_function("record_uncontended", |b| {
        let keys = method_keys(100_000, 1_000);
        let profile = SharedProfile::new();
        let mut i = 0usize;
        b.iter(|| {
            black_box(profile.record(Arc::clone(&keys[i % keys.len()])));
            i = i.wrapping_add(1);
        });
    });

    group.throughput(Throughput::Elements(40_000));
    group.bench_function("record_4_threads", |b| {
        let keys = Arc::new(method_keys(10_000, 1_000));
        b.iter(|| {
            let profile = Arc::new(SharedProfile::new());
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let profile = Arc::clone(&profile);
                    let keys = Arc::clone(&keys);
                    thread::spawn(move || {
                        for key in keys.iter() {
                            profile.record(Arc::clone(key));
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }
            black_box(profile.total())
        });
    });

    group.finish();
}

// ============================================================================
// Reporter Benchmarks
// ============================================================================

fn bench_reporter(c: &mut Criterion) {
    let mut group = c.benchmark_group("reporter");

    group.bench_function("render_top20", |b| {
        let profile: TopKProfile<Arc<str>> = method_keys(100_000, 10_000).into_iter().collect();
        let reporter = Reporter::from_config(&SamplingConfig::default());
        b.iter(|| black_box(reporter.render(&profile).unwrap()));
    });

    group.finish();
}

// ============================================================================
// Main
// ============================================================================

criterion_group!(
    benches,
    bench_top_k_profile,
    bench_shared_profile,
    bench_reporter,
);

criterion_main!(benches);
