use tch::{nn, Tensor};

pub mod dnn;

pub const HISTORY_BOARDS: i64 = 8; // model's amount of history positions stored.
pub const INPUT_PLANES: i64 =
  HISTORY_BOARDS * 14 + 7; // (6 white pieces + 6 black pieces + 2 repetitions) per history board. 7 situational planes.
pub const TRUNK_CHANNELS: i64 = 119; // channels per resnet block.
pub const TOWER_SIZE: usize = 20; // amount of resnet blocks.
pub const BOARD_SIZE: i64 = 8; // board width and height.
pub const ACTION_SIZE: i64 = 4672; // amount of move encodings the policy covers.
pub const VALUE_HIDDEN: i64 = 256; // hidden width of the value head.

#[derive(Debug)]
pub struct ConvBlock {
  conv: nn::Conv2D,
  bn: nn::BatchNorm,
}

#[derive(Debug)]
pub struct ResBlock {
  conv1: ConvBlock,
  conv2: nn::Conv2D,
  bn: nn::BatchNorm,
}

#[derive(Debug)]
pub struct ValueHead {
  conv: ConvBlock,
  fc1: nn::Linear,
  fc2: nn::Linear,
}

#[derive(Debug)]
pub struct PolicyHead {
  conv: ConvBlock,
  fc: nn::Linear,
}

#[derive(Debug)]
pub struct DNN {
  board_size: i64,
  action_size: i64,
  num_channels: i64,
  vs: nn::VarStore,
  conv: ConvBlock,
  tower: Vec<ResBlock>,
  value_head: ValueHead,
  policy_head: PolicyHead,
}

// the return struct on a forward pass of the whole model.
#[derive(Debug)]
pub struct Eval {
  pub value: Tensor,
  pub policy: Tensor,
}
