use candle_core::{Result, Tensor};
use candle_nn::{linear, Linear, Module, VarBuilder};

const HIDDEN: [usize; 3] = [256, 128, 64];

pub struct FcClassifier {
    hidden1: Linear,
    hidden2: Linear,
    hidden3: Linear,
    output: Linear,
}

impl FcClassifier {
    pub fn new(vs: &VarBuilder, input_len: usize, num_labels: usize) -> Result<Self> {
        Ok(Self {
            hidden1: linear(input_len, HIDDEN[0], vs.pp("hidden1"))?,
            hidden2: linear(HIDDEN[0], HIDDEN[1], vs.pp("hidden2"))?,
            hidden3: linear(HIDDEN[1], HIDDEN[2], vs.pp("hidden3"))?,
            output: linear(HIDDEN[2], num_labels, vs.pp("output"))?,
        })
    }
}

impl Module for FcClassifier {
    /// `(batch, len)` values to `(batch, labels)` logits.
    fn forward(&self, x: &Tensor) -> Result<Tensor> {
        let x = x.apply(&self.hidden1)?.relu()?;
        let x = x.apply(&self.hidden2)?.relu()?;
        let x = x.apply(&self.hidden3)?.relu()?;
        x.apply(&self.output)
    }
}
