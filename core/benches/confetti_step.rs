use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use noughts_core::ConfettiField;
use std::hint::black_box;

fn bench_confetti_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("confetti_step");

    group.bench_function("idle", |b| {
        let mut field = ConfettiField::new(0, 1920.0, 1080.0);
        b.iter(|| black_box(field.tick(black_box(1.0))));
    });

    // a win spawns 136 particles; a few overlapping wins is the realistic worst case
    for count in [136, 1_000] {
        group.bench_function(format!("burst/{count}"), |b| {
            b.iter_batched(
                || {
                    let mut field = ConfettiField::new(0, 1920.0, 1080.0);
                    field.spawn_burst(Some((960.0, 540.0)), count);
                    field
                },
                |mut field| {
                    for _ in 0..60 {
                        field.tick(1.0);
                    }
                    field
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_confetti_step);
criterion_main!(benches);
