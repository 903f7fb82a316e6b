use candle_core::{Result, Tensor, D};
use candle_nn::{conv1d, linear, Conv1d, Conv1dConfig, Linear, Module, VarBuilder};

const KERNEL: usize = 5;
const STRIDE: usize = 3;
const CHANNELS: [usize; 4] = [1, 128, 256, 128];

pub struct ConvClassifier {
    conv1: Conv1d,
    conv2: Conv1d,
    conv3: Conv1d,
    output: Linear,
}

impl ConvClassifier {
    pub fn new(vs: &VarBuilder, input_len: usize, num_labels: usize) -> Result<Self> {
        let min_len = Self::min_input_len();
        if input_len < min_len {
            candle_core::bail!(
                "conv classifier needs at least {} points, got {}",
                min_len,
                input_len
            );
        }

        let cfg = Conv1dConfig {
            stride: STRIDE,
            ..Default::default()
        };

        Ok(Self {
            conv1: conv1d(CHANNELS[0], CHANNELS[1], KERNEL, cfg, vs.pp("conv1"))?,
            conv2: conv1d(CHANNELS[1], CHANNELS[2], KERNEL, cfg, vs.pp("conv2"))?,
            conv3: conv1d(CHANNELS[2], CHANNELS[3], KERNEL, cfg, vs.pp("conv3"))?,
            output: linear(CHANNELS[3], num_labels, vs.pp("output"))?,
        })
    }

    /// Shortest input that leaves one position after the three convolutions.
    pub fn min_input_len() -> usize {
        (0..3).fold(1, |len, _| (len - 1) * STRIDE + KERNEL)
    }
}

impl Module for ConvClassifier {
    /// `(batch, len)` values to `(batch, labels)` logits.
    fn forward(&self, x: &Tensor) -> Result<Tensor> {
        let x = x.unsqueeze(1)?;
        let x = x.apply(&self.conv1)?.relu()?;
        let x = x.apply(&self.conv2)?.relu()?;
        let x = x.apply(&self.conv3)?;

        // Global average pool over time.
        let x = x.mean(D::Minus1)?;
        x.apply(&self.output)
    }
}
