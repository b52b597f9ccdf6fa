use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use cerebellum_core::{
    context::context_from, CerebellumConfig, CerebellumEngine, CorrectionRequest, NearestBiasMemory,
};

/// Memory with `episodes` keys spread along the first axis
fn populated_memory(dim: usize, episodes: usize) -> Arc<NearestBiasMemory> {
    let memory = Arc::new(NearestBiasMemory::with_radius(0.5));
    for i in 0..episodes {
        let mut key = vec![0.0; dim];
        key[0] = i as f64 * 0.01;
        memory.store(&key, &vec![0.001; dim], 0.8);
    }
    memory
}

fn bench_step_without_memory(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_no_memory");
    for dim in [3usize, 6, 12] {
        let mut engine = CerebellumEngine::new(dim, CerebellumConfig::default()).unwrap();
        let current = vec![0.1; dim];
        let target = vec![0.0; dim];

        group.bench_with_input(BenchmarkId::from_parameter(dim), &dim, |b, _| {
            b.iter(|| {
                engine
                    .compute_correction(CorrectionRequest::new(black_box(&current), black_box(&target)))
                    .unwrap()
            });
        });
    }
    group.finish();
}

fn bench_step_with_memory(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_with_memory");
    let ctx = context_from([("tool", "A".into()), ("temperature", 25.0.into())]);

    for episodes in [10usize, 100, 1000] {
        let mut engine =
            CerebellumEngine::with_memory(6, CerebellumConfig::robot_arm(), populated_memory(6, episodes)).unwrap();
        let current = vec![0.05; 6];
        let target = vec![0.0; 6];

        group.bench_with_input(BenchmarkId::from_parameter(episodes), &episodes, |b, _| {
            b.iter(|| {
                engine
                    .compute_correction(CorrectionRequest::new(black_box(&current), &target).context(&ctx))
                    .unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_step_without_memory, bench_step_with_memory);
criterion_main!(benches);
