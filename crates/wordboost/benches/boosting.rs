//! Training throughput, batch scoring and link grouping.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use wordboost::align::Grouper;
use wordboost::testing::data::{random_feature_vectors, random_links, sentence, synthetic_samples};
use wordboost::{BoostConfig, Booster, Parallelism};

fn bench_train(c: &mut Criterion) {
    let mut group = c.benchmark_group("train");
    group.sample_size(10);

    for rows in [500usize, 2_000] {
        let samples = synthetic_samples(rows, 20, 42, 0.05);
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::new("depth2_100steps", rows), &samples, |b, samples| {
            b.iter(|| {
                let config = BoostConfig::builder().n_steps(100).build().unwrap();
                black_box(Booster::train(black_box(samples), config).unwrap())
            })
        });
    }
    group.finish();
}

fn bench_predict(c: &mut Criterion) {
    let samples = synthetic_samples(1_000, 20, 7, 0.05);
    let config = BoostConfig::builder().n_steps(300).tree_depth(4).build().unwrap();
    let (booster, _) = Booster::train(&samples, config).unwrap();
    let rows = random_feature_vectors(10_000, 20, 8);

    let mut group = c.benchmark_group("predict");
    group.throughput(Throughput::Elements(rows.len() as u64));
    for parallelism in [Parallelism::Sequential, Parallelism::Parallel] {
        group.bench_function(format!("{parallelism:?}"), |b| {
            b.iter(|| black_box(booster.predict_par(black_box(&rows), parallelism)))
        });
    }
    group.finish();
}

fn bench_grouping(c: &mut Criterion) {
    let mut group = c.benchmark_group("grouping");
    for len in [10usize, 40] {
        let source = sentence("s", len, 5);
        let target = sentence("t", len, 7);
        let links = random_links(&source, &target, 3, 11);
        let grouper = Grouper::default();

        group.throughput(Throughput::Elements(links.len() as u64));
        group.bench_with_input(BenchmarkId::new("build", len), &links, |b, links| {
            b.iter(|| black_box(grouper.build(&source, &target, black_box(links)).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_train, bench_predict, bench_grouping);
criterion_main!(benches);
