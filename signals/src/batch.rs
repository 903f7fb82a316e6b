use candle_core::{Device, Result, Tensor};

use crate::signal::Signal;

/// A stacked mini-batch.
pub struct Batch {
    /// `(batch, len)` observed values.
    pub values: Tensor,
    /// `(batch, len)` sample times.
    pub timestamps: Tensor,
    /// `(batch,)` class ids, present only when every signal is labelled.
    pub labels: Option<Tensor>,
}

impl Batch {
    pub fn from_signals(signals: &[&Signal], device: &Device) -> Result<Self> {
        let batch_len = signals.len();
        let signal_len = signals.first().map_or(0, |s| s.len());

        let mut values = Vec::with_capacity(batch_len * signal_len);
        let mut timestamps = Vec::with_capacity(batch_len * signal_len);
        let mut labels = Vec::with_capacity(batch_len);

        for signal in signals {
            if signal.len() != signal_len {
                candle_core::bail!(
                    "cannot batch signals of length {} and {}",
                    signal_len,
                    signal.len()
                );
            }
            values.extend_from_slice(&signal.values);
            timestamps.extend_from_slice(&signal.timestamps);
            if let Some(label) = signal.label {
                labels.push(label);
            }
        }

        let labels = if labels.len() == batch_len {
            Some(Tensor::from_vec(labels, batch_len, device)?)
        } else {
            None
        };

        Ok(Self {
            values: Tensor::from_vec(values, (batch_len, signal_len), device)?,
            timestamps: Tensor::from_vec(timestamps, (batch_len, signal_len), device)?,
            labels,
        })
    }

    pub fn len(&self) -> usize {
        self.values.dims().first().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Iterates over `indices` in order, `batch_size` signals at a time.
pub struct Batches<'a> {
    signals: &'a [Signal],
    indices: &'a [usize],
    device: &'a Device,
    batch_size: usize,
    idx: usize,
}

impl<'a> Batches<'a> {
    pub(crate) fn new(
        signals: &'a [Signal],
        indices: &'a [usize],
        batch_size: usize,
        device: &'a Device,
    ) -> Self {
        Self {
            signals,
            indices,
            device,
            batch_size: batch_size.max(1),
            idx: 0,
        }
    }

    pub fn num_batches(&self) -> usize {
        self.indices.len().div_ceil(self.batch_size)
    }
}

impl Iterator for Batches<'_> {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.idx >= self.indices.len() {
            return None;
        }
        let end = (self.idx + self.batch_size).min(self.indices.len());
        let chunk = &self.indices[self.idx..end];
        self.idx = end;

        let selected: Vec<&Signal> = chunk.iter().map(|&i| &self.signals[i]).collect();
        Some(Batch::from_signals(&selected, self.device))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::DatasetKind;
    use crate::signal::SignalSet;

    fn set() -> SignalSet {
        let signals = (0..5)
            .map(|i| Signal::new(vec![i as f32; 3], vec![0.0, 0.5, 1.0]).with_label(i % 3))
            .collect();
        SignalSet::new(DatasetKind::NSynth, signals)
    }

    #[test]
    fn test_batches_cover_indices() -> Result<()> {
        let set = set();
        let indices = vec![4, 2, 0, 1, 3];
        let batches = set.batches(&indices, 2, &Device::Cpu);
        assert_eq!(batches.num_batches(), 3);

        let batches: Vec<Batch> = batches.collect::<Result<_>>()?;
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].values.dims(), &[2, 3]);
        assert_eq!(batches[2].len(), 1);

        let first: Vec<Vec<f32>> = batches[0].values.to_vec2()?;
        assert_eq!(first[0], vec![4.0; 3]);
        assert_eq!(first[1], vec![2.0; 3]);

        let labels: Vec<u32> = batches[0].labels.as_ref().unwrap().to_vec1()?;
        assert_eq!(labels, vec![1, 2]);
        Ok(())
    }

    #[test]
    fn test_unlabelled_batch_has_no_labels() -> Result<()> {
        let signal = Signal::new(vec![1.0, 2.0], vec![0.0, 1.0]);
        let batch = Batch::from_signals(&[&signal, &signal], &Device::Cpu)?;
        assert!(batch.labels.is_none());
        assert_eq!(batch.timestamps.to_vec2::<f32>()?[1], vec![0.0, 1.0]);
        Ok(())
    }

    #[test]
    fn test_ragged_batch_fails() {
        let a = Signal::new(vec![1.0, 2.0], vec![0.0, 1.0]);
        let b = Signal::new(vec![1.0], vec![0.0]);
        assert!(Batch::from_signals(&[&a, &b], &Device::Cpu).is_err());
    }
}
