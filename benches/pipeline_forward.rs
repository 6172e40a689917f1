use convae::layers::{ConvLayer, Layer, TanhFunction};
use convae::model::{ConvAutoEncoder, TrainableModel};
use convae::optim::SGD;
use convae::tensor::Tensor;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;

fn conv(in_c: usize, out_c: usize) -> Box<dyn Layer> {
    Box::new(ConvLayer::new(
        in_c,
        out_c,
        3,
        1,
        1,
        Box::new(TanhFunction),
        Box::new(TanhFunction),
    ))
}

fn bench_pipeline(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let x = Tensor::from_vec(
        4,
        1,
        16,
        16,
        (0..4 * 16 * 16).map(|_| rng.gen()).collect(),
    );
    let mut model =
        ConvAutoEncoder::new(vec![conv(1, 8), conv(8, 4)], Box::new(SGD::new(0.0, 0.0)));

    c.bench_function("autoencoder_forward", |bencher| {
        bencher.iter(|| {
            let y = model.forward(black_box(&x)).unwrap();
            black_box(y);
        });
    });

    let y = model.forward(&x).unwrap();
    c.bench_function("autoencoder_backward", |bencher| {
        bencher.iter(|| {
            let d = model.backward(black_box(&y)).unwrap();
            black_box(d);
        });
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
