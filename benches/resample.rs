use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::DMatrix;
use particle_pdf_rs::ParticlePdf;

fn grid_prior(n_dims: usize, n_particles: usize) -> DMatrix<f64> {
    DMatrix::from_fn(n_dims, n_particles, |i, j| ((i + 1) as f64 * j as f64 * 0.0173).sin())
}

fn bench_statistics(c: &mut Criterion) {
    let pdf = ParticlePdf::seeded(grid_prior(3, 10_000), 0).unwrap();

    c.bench_function("mean_3x10000", |b| b.iter(|| black_box(pdf.mean())));
    c.bench_function("covariance_3x10000", |b| {
        b.iter(|| black_box(pdf.covariance()))
    });
}

fn bench_resample(c: &mut Criterion) {
    let mut pdf = ParticlePdf::seeded(grid_prior(3, 10_000), 0).unwrap();

    c.bench_function("resample_3x10000", |b| {
        b.iter(|| pdf.resample().unwrap())
    });

    let likelihood: Vec<f64> = (0..10_000).map(|j| if j % 4 == 0 { 1.0 } else { 0.1 }).collect();
    c.bench_function("bayesian_update_3x10000", |b| {
        b.iter(|| pdf.bayesian_update(black_box(&likelihood)).unwrap())
    });

    c.bench_function("draw_1000", |b| b.iter(|| black_box(pdf.draw(1000).unwrap())));
}

criterion_group!(benches, bench_statistics, bench_resample);
criterion_main!(benches);
