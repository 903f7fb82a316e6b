use candle_core::{DType, Device, D};
use signals::{SignalError, SignalSet};

use crate::error::TrainError;
use crate::network::{Model, Task};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EvalReport {
    /// Sample-weighted mean loss.
    pub loss: f32,
    /// Fraction of correct predictions, classifiers only.
    pub accuracy: Option<f32>,
}

impl EvalReport {
    /// The value the early-stopping supervisor watches for this task.
    pub fn monitored(&self, task: Task) -> f64 {
        match task {
            Task::Classify => self.accuracy.unwrap_or(f32::NAN) as f64,
            Task::Reconstruct => self.loss as f64,
        }
    }
}

pub fn evaluate(
    model: &Model,
    set: &SignalSet,
    batch_size: usize,
    device: &Device,
) -> Result<EvalReport, TrainError> {
    let task = model.task();
    let indices = set.indices();

    let mut total_loss = 0.0f64;
    let mut correct = 0.0f64;
    let mut total = 0usize;

    for batch in set.batches(&indices, batch_size, device) {
        let batch = batch?;
        let batch_len = batch.len();
        if batch_len == 0 {
            continue;
        }

        let output = model.forward(&batch)?;
        let loss = task.loss(&output, &batch)?;
        total_loss += loss.to_scalar::<f32>()? as f64 * batch_len as f64;

        if let (Task::Classify, Some(labels)) = (task, &batch.labels) {
            let hits = output
                .argmax(D::Minus1)?
                .eq(labels)?
                .to_dtype(DType::F32)?
                .sum_all()?
                .to_scalar::<f32>()?;
            correct += hits as f64;
        }

        total += batch_len;
    }

    if total == 0 {
        return Err(SignalError::Empty(format!("{} evaluation split", set.kind)).into());
    }

    let denom = total as f64;
    Ok(EvalReport {
        loss: (total_loss / denom) as f32,
        accuracy: match task {
            Task::Classify => Some((correct / denom) as f32),
            Task::Reconstruct => None,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Harmonics, ModelShape};
    use crate::network::ModelKind;
    use signals::DatasetKind;

    #[test]
    fn test_monitored_metric_follows_task() {
        let report = EvalReport {
            loss: 0.4,
            accuracy: Some(0.75),
        };
        assert_eq!(report.monitored(Task::Classify), 0.75);
        assert_eq!(report.monitored(Task::Reconstruct), 0.4f32 as f64);
    }

    #[test]
    fn test_empty_split_is_an_error() {
        let vm = candle_nn::VarMap::new();
        let vs = candle_nn::VarBuilder::from_varmap(&vm, DType::F32, &Device::Cpu);
        let shape = ModelShape {
            input_len: 8,
            num_labels: None,
            hidden_dim: 8,
            harmonics: Harmonics::default(),
        };
        let model = Model::new(ModelKind::Fourier, &shape, vs).unwrap();
        let empty = SignalSet::new(DatasetKind::Sinusoid, Vec::new());

        assert!(matches!(
            evaluate(&model, &empty, 4, &Device::Cpu),
            Err(TrainError::Signal(SignalError::Empty(_)))
        ));
    }

    #[test]
    fn test_missing_accuracy_is_not_finite() {
        let report = EvalReport {
            loss: 0.4,
            accuracy: None,
        };
        assert!(report.monitored(Task::Classify).is_nan());
    }
}
