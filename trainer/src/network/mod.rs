mod conv;
mod fc;
mod fourier;

pub use conv::ConvClassifier;
pub use fc::FcClassifier;
pub use fourier::FourierDecoder;

use candle_core::{Result, Tensor};
use candle_nn::{Module, VarBuilder};
use clap::ValueEnum;
use signals::Batch;
use supervisor::Direction;

use crate::config::ModelShape;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModelKind {
    /// Fully connected classifier over the raw trajectory.
    Fc,
    /// Strided 1-D convolution classifier.
    Conv,
    /// Encoder to Fourier coefficients, decoded at the sample times.
    Fourier,
}

impl ModelKind {
    pub fn task(self) -> Task {
        match self {
            ModelKind::Fc | ModelKind::Conv => Task::Classify,
            ModelKind::Fourier => Task::Reconstruct,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    /// Cross-entropy on labels, monitored by evaluation accuracy.
    Classify,
    /// Mean squared reconstruction error, monitored by evaluation loss.
    Reconstruct,
}

impl Task {
    pub fn direction(self) -> Direction {
        match self {
            Task::Classify => Direction::Maximize,
            Task::Reconstruct => Direction::Minimize,
        }
    }

    pub fn metric_name(self) -> &'static str {
        match self {
            Task::Classify => "eval_acc",
            Task::Reconstruct => "eval_loss",
        }
    }

    pub fn loss(self, output: &Tensor, batch: &Batch) -> Result<Tensor> {
        match self {
            Task::Classify => {
                let labels = batch
                    .labels
                    .as_ref()
                    .ok_or_else(|| candle_core::Error::Msg("batch has no labels".into()))?;
                candle_nn::loss::cross_entropy(output, labels)
            }
            Task::Reconstruct => candle_nn::loss::mse(output, &batch.values),
        }
    }
}

pub enum Model {
    Fc(FcClassifier),
    Conv(ConvClassifier),
    Fourier(FourierDecoder),
}

impl Model {
    pub fn new(kind: ModelKind, shape: &ModelShape, vs: VarBuilder) -> Result<Self> {
        let labels = || {
            shape.num_labels.ok_or_else(|| {
                candle_core::Error::Msg(format!("{:?} classifier needs labelled data", kind))
            })
        };

        Ok(match kind {
            ModelKind::Fc => Model::Fc(FcClassifier::new(&vs, shape.input_len, labels()?)?),
            ModelKind::Conv => Model::Conv(ConvClassifier::new(&vs, shape.input_len, labels()?)?),
            ModelKind::Fourier => Model::Fourier(FourierDecoder::new(
                &vs,
                shape.input_len,
                shape.hidden_dim,
                shape.harmonics,
            )?),
        })
    }

    pub fn task(&self) -> Task {
        match self {
            Model::Fc(_) => ModelKind::Fc.task(),
            Model::Conv(_) => ModelKind::Conv.task(),
            Model::Fourier(_) => ModelKind::Fourier.task(),
        }
    }

    pub fn forward(&self, batch: &Batch) -> Result<Tensor> {
        match self {
            Model::Fc(net) => net.forward(&batch.values),
            Model::Conv(net) => net.forward(&batch.values),
            Model::Fourier(net) => net.reconstruct(&batch.values, &batch.timestamps),
        }
    }
}
