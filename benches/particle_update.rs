//! Benchmarks for the per-frame CPU pipeline.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use morphcloud::hands::{FINGERTIPS, LANDMARK_COUNT};
use morphcloud::prelude::*;
use morphcloud::{FormationState, ParticleUpdater, TargetShapeSet};

fn fingertip_forces() -> Vec<ForcePoint> {
    (0..5)
        .map(|i| {
            let p = Vec3::new(i as f32 - 2.0, 0.0, 1.0);
            if i == 0 || i == 3 {
                ForcePoint::pull(p)
            } else {
                ForcePoint::push(p)
            }
        })
        .collect()
}

fn bench_updater(c: &mut Criterion) {
    let mut group = c.benchmark_group("updater");
    let updater = ParticleUpdater::default();
    let mut state = FormationState::default();
    state.set_factor(0.7);

    for count in [1_000usize, 10_000, 100_000] {
        let targets = TargetShapeSet::generate(count, Some(1));

        group.bench_with_input(BenchmarkId::new("no_forces", count), &count, |b, _| {
            let mut positions = targets.chaos().to_vec();
            b.iter(|| updater.update(&targets, &state, &[], black_box(&mut positions)))
        });

        let forces = fingertip_forces();
        group.bench_with_input(BenchmarkId::new("five_forces", count), &count, |b, _| {
            let mut positions = targets.chaos().to_vec();
            b.iter(|| updater.update(&targets, &state, &forces, black_box(&mut positions)))
        });
    }

    group.finish();
}

fn bench_shapes(c: &mut Criterion) {
    c.bench_function("generate_10k", |b| {
        b.iter(|| black_box(TargetShapeSet::generate(10_000, Some(5))))
    });
}

fn bench_tick(c: &mut Criterion) {
    let config = SimConfig {
        seed: Some(1),
        ..Default::default()
    };
    let mut sim = SimulationState::new(&config).unwrap();

    let mut landmarks = vec![Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
    for (slot, &tip) in FINGERTIPS.iter().enumerate() {
        landmarks[tip] = Landmark::new(0.3 + slot as f32 * 0.1, 0.4, 0.0);
    }
    let frame = DetectorFrame::new(vec![Hand::new(landmarks)]);

    c.bench_function("tick_10k_tracking", |b| {
        b.iter(|| black_box(sim.tick(Some(&frame))))
    });
}

criterion_group!(benches, bench_updater, bench_shapes, bench_tick);
criterion_main!(benches);
