use std::f64::consts::PI;

use candle_core::{Result, Tensor};
use candle_nn::{linear, Linear, VarBuilder};

use crate::config::Harmonics;

/// Encodes an observed trajectory into sine/cosine coefficients of integer
/// harmonics plus an offset, then evaluates the series at arbitrary times.
pub struct FourierDecoder {
    hidden1: Linear,
    hidden2: Linear,
    coefficients: Linear,
    /// `(1, harmonics, 1)` so it broadcasts against `(batch, 1, len)` times.
    frequencies: Tensor,
    harmonics: usize,
}

impl FourierDecoder {
    pub fn new(
        vs: &VarBuilder,
        input_len: usize,
        hidden_dim: usize,
        harmonics: Harmonics,
    ) -> Result<Self> {
        let count = harmonics.count();
        let frequencies = Tensor::arange(
            harmonics.lower as f32,
            harmonics.upper as f32 + 1.0,
            vs.device(),
        )?
        .reshape((1, count, 1))?;

        Ok(Self {
            hidden1: linear(input_len, hidden_dim, vs.pp("hidden1"))?,
            hidden2: linear(hidden_dim, hidden_dim, vs.pp("hidden2"))?,
            coefficients: linear(hidden_dim, 2 * count + 1, vs.pp("coefficients"))?,
            frequencies,
            harmonics: count,
        })
    }

    /// `(batch, len)` values to `(batch, 2 * harmonics + 1)` coefficients.
    pub fn encode(&self, values: &Tensor) -> Result<Tensor> {
        let h1 = values.apply(&self.hidden1)?.relu()?;
        let h2 = (h1.apply(&self.hidden2)? + &h1)?.relu()?;
        h2.apply(&self.coefficients)
    }

    /// Evaluates the series for `(batch, len)` timestamps.
    pub fn decode(&self, coefficients: &Tensor, timestamps: &Tensor) -> Result<Tensor> {
        let h = self.harmonics;

        let angles = timestamps
            .unsqueeze(1)?
            .broadcast_mul(&self.frequencies)?
            .affine(2.0 * PI, 0.0)?;
        let basis = Tensor::cat(&[&angles.sin()?, &angles.cos()?], 1)?;

        let weights = coefficients.narrow(1, 0, 2 * h)?.unsqueeze(1)?.contiguous()?;
        let offset = coefficients.narrow(1, 2 * h, 1)?;

        weights.matmul(&basis)?.squeeze(1)?.broadcast_add(&offset)
    }

    pub fn reconstruct(&self, values: &Tensor, timestamps: &Tensor) -> Result<Tensor> {
        let coefficients = self.encode(values)?;
        self.decode(&coefficients, timestamps)
    }
}
