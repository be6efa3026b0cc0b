use super::*;
use tch::{nn, no_grad, Device, Kind, Tensor};
use anyhow::Result;

fn conv2d(p: &nn::Path, c_in: i64, c_out: i64, ksize: i64, padding: i64) -> nn::Conv2D {
  let conv2d_cfg = nn::ConvConfig {
    padding,
    bias: false,
    ..Default::default()
  };
  nn::conv2d(p, c_in, c_out, ksize, conv2d_cfg)
}

impl ConvBlock {
  pub fn new(p: &nn::Path, c_in: i64, c_out: i64, ksize: i64, padding: i64) -> ConvBlock {
    ConvBlock {
      conv: conv2d(&(p / "conv"), c_in, c_out, ksize, padding),
      bn: nn::batch_norm2d(p / "bn", c_out, Default::default()),
    }
  }
  pub fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
    xs.apply(&self.conv).apply_t(&self.bn, train).relu()
  }
}

impl ResBlock {
  pub fn new(p: &nn::Path, channels: i64) -> ResBlock {
    ResBlock {
      conv1: ConvBlock::new(&(p / "conv1"), channels, channels, 3, 1),
      conv2: conv2d(&(p / "conv2"), channels, channels, 3, 1),
      bn: nn::batch_norm2d(p / "bn", channels, Default::default()),
    }
  }
  pub fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
    let ys = self
      .conv1
      .forward_t(xs, train)
      .apply(&self.conv2)
      .apply_t(&self.bn, train);
    (xs + ys).relu()
  }
}

impl ValueHead {
  pub fn new(p: &nn::Path, channels: i64, board_size: i64) -> ValueHead {
    let flat = channels * board_size * board_size;
    ValueHead {
      conv: ConvBlock::new(&(p / "conv"), channels, channels, 1, 0),
      fc1: nn::linear(p / "fc1", flat, VALUE_HIDDEN, Default::default()),
      fc2: nn::linear(p / "fc2", VALUE_HIDDEN, 1, Default::default()),
    }
  }
  pub fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
    self
      .conv
      .forward_t(xs, train)
      .flatten(1, -1)
      .apply(&self.fc1)
      .relu()
      .apply(&self.fc2)
      .tanh()
  }
}

impl PolicyHead {
  pub fn new(p: &nn::Path, channels: i64, board_size: i64, action_size: i64) -> PolicyHead {
    let flat = 2 * channels * board_size * board_size;
    PolicyHead {
      conv: ConvBlock::new(&(p / "conv"), channels, 2 * channels, 1, 0),
      fc: nn::linear(p / "fc", flat, action_size, Default::default()),
    }
  }
  pub fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
    self
      .conv
      .forward_t(xs, train)
      .flatten(1, -1)
      .apply(&self.fc)
      .softmax(-1, Kind::Float)
  }
}

impl DNN {
  pub fn new(board_size: i64, action_size: i64, num_channels: i64) -> DNN {
    let vs = nn::VarStore::new(Device::cuda_if_available());
    let root = vs.root();
    let conv = ConvBlock::new(&(&root / "conv"), INPUT_PLANES, num_channels, 3, 1);
    let mut tower = Vec::with_capacity(TOWER_SIZE);
    for i in 0..TOWER_SIZE {
      tower.push(ResBlock::new(&(&root / format!("res{}", i)), num_channels));
    }
    let value_head = ValueHead::new(&(&root / "value_head"), num_channels, board_size);
    let policy_head = PolicyHead::new(&(&root / "policy_head"), num_channels, board_size, action_size);
    DNN {
      board_size,
      action_size,
      num_channels,
      vs,
      conv,
      tower,
      value_head,
      policy_head,
    }
  }
  pub fn forward_t(&self, xs: &Tensor, train: bool) -> Eval {
    let mut state = self.conv.forward_t(xs, train);
    for block in &self.tower {
      state = block.forward_t(&state, train);
    }
    Eval {
      value: self.value_head.forward_t(&state, train),
      policy: self.policy_head.forward_t(&state, train),
    }
  }
  pub fn predict(&self, board: Vec<f32>) -> (Vec<f32>, f32) {
    let b = Tensor::of_slice(&board)
      .to_device(self.vs.device())
      .view([1, INPUT_PLANES, self.board_size, self.board_size]);
    let eval = no_grad(|| self.forward_t(&b, false));
    let pi = Vec::<f32>::from(&eval.policy);
    let v = eval.value.double_value(&[0, 0]) as f32;
    (pi, v)
  }
  pub fn predict_batch(&self, boards: Vec<Vec<f32>>) -> Vec<(Vec<f32>, f32)> {
    let num = boards.len() as i64;
    let b = Tensor::of_slice2(&boards)
      .to_device(self.vs.device())
      .view([num, INPUT_PLANES, self.board_size, self.board_size]);
    let eval = no_grad(|| self.forward_t(&b, false));
    let mut res = Vec::new();
    for i in 0..num {
      let pi = Vec::<f32>::from(eval.policy.narrow(0, i, 1));
      let v = eval.value.double_value(&[i, 0]) as f32;
      res.push((pi, v));
    }
    res
  }
  pub fn device(&self) -> Device {
    self.vs.device()
  }
  pub fn save<T: AsRef<std::path::Path>>(&self, path: T) -> Result<()> {
    self.vs.save(path)?;
    Ok(())
  }
  pub fn load<T: AsRef<std::path::Path>>(&mut self, path: T) -> Result<()> {
    self.vs.load(path)?;
    Ok(())
  }
}
