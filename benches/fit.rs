use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use logreg_rs::{
    backend::Backend,
    dataset::{make_blobs, InMemoryDataset},
    loss::BCEWithLogitsLoss,
    model::logistic::{LogisticParams, LogisticRegression},
    optimizer::SGD,
    trainer::Trainer,
    CpuBackend, NdarrayBackend,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn blobs(n_features: usize) -> InMemoryDataset {
    let mut rng = StdRng::seed_from_u64(71);
    make_blobs(500, n_features, 2.0, &mut rng).expect("Failed to build dataset")
}

fn fit_once<B: Backend>(data: &InMemoryDataset, n_features: usize) {
    let trainer = Trainer::<B, _, _, LogisticRegression<B>, LogisticParams<B>>::builder(
        BCEWithLogitsLoss,
        SGD::new(0.1),
    )
    .batch_size(64)
    .max_epochs(20)
    .log_every(0)
    .build();
    let mut rng = StdRng::seed_from_u64(0);
    let fitted = trainer
        .fit(LogisticRegression::new(n_features), data, &mut rng)
        .expect("Failed to fit model");
    black_box(fitted);
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit_20_epochs");
    for n_features in [2, 8, 32] {
        let data = blobs(n_features);
        group.bench_with_input(BenchmarkId::new("cpu", n_features), &data, |b, d| {
            b.iter(|| fit_once::<CpuBackend>(d, n_features))
        });
        group.bench_with_input(BenchmarkId::new("ndarray", n_features), &data, |b, d| {
            b.iter(|| fit_once::<NdarrayBackend>(d, n_features))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fit);
criterion_main!(benches);
