use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mnist_knn::dataset::{encode_image_set, encode_label_set};
use mnist_knn::ml::euclidean_distance;
use mnist_knn::{Image, ImageSet, KNNClassifier, KNNConfig, Label, LabelSet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ROWS: usize = 28;
const COLS: usize = 28;

fn random_image(rng: &mut StdRng) -> Image {
    Image::new(ROWS, COLS, (0..ROWS * COLS).map(|_| rng.gen()).collect()).unwrap()
}

fn bench_distance(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let a = random_image(&mut rng);
    let b = random_image(&mut rng);
    c.bench_function("euclidean_distance 28x28", |bencher| {
        bencher.iter(|| euclidean_distance(black_box(&a), black_box(&b)).unwrap())
    });
}

fn bench_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("knn_predict");
    let mut rng = StdRng::seed_from_u64(2);
    let query = random_image(&mut rng);

    for &n in &[100usize, 1_000, 5_000] {
        let train: Vec<Image> = (0..n).map(|_| random_image(&mut rng)).collect();
        let labels: Vec<Label> = (0..n).map(|_| rng.gen_range(0..10)).collect();
        let images =
            ImageSet::from_reader(Cursor::new(encode_image_set(ROWS, COLS, &train).unwrap()))
                .unwrap();
        let labels =
            LabelSet::from_reader(Cursor::new(encode_label_set(&labels).unwrap())).unwrap();
        let mut knn = KNNClassifier::new(KNNConfig::default(), images, labels).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(n), &query, |bencher, q| {
            bencher.iter(|| knn.predict(black_box(q)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_distance, bench_predict);
criterion_main!(benches);
