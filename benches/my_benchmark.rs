use criterion::{black_box, criterion_group, criterion_main, Criterion};

use az_dnn::*;
use tch::Tensor;

fn forward_benchmark(c: &mut Criterion) {
  let net = DNN::new(BOARD_SIZE, ACTION_SIZE, TRUNK_CHANNELS);
  let xs = Tensor::randn(
    &[1, INPUT_PLANES, BOARD_SIZE, BOARD_SIZE],
    tch::kind::FLOAT_CPU,
  )
  .to_device(net.device());
  c.bench_function("forward", |b| {
    b.iter(|| net.forward_t(black_box(&xs), false))
  });
  let planes = (INPUT_PLANES * BOARD_SIZE * BOARD_SIZE) as usize;
  c.bench_function("predict_batch 32", |b| {
    b.iter(|| net.predict_batch(black_box(vec![vec![0.5f32; planes]; 32])))
  });
}

criterion_group!(benches, forward_benchmark);
criterion_main!(benches);
