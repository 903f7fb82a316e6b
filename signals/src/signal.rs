use candle_core::Device;

use crate::batch::Batches;
use crate::error::SignalError;
use crate::kind::DatasetKind;

/// One univariate trajectory and the times it was sampled at.
#[derive(Clone, Debug, PartialEq)]
pub struct Signal {
    pub values: Vec<f32>,
    pub timestamps: Vec<f32>,
    pub label: Option<u32>,
}

impl Signal {
    pub fn new(values: Vec<f32>, timestamps: Vec<f32>) -> Self {
        debug_assert_eq!(values.len(), timestamps.len());
        Self {
            values,
            timestamps,
            label: None,
        }
    }

    pub fn with_label(mut self, label: u32) -> Self {
        self.label = Some(label);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct SignalSet {
    pub kind: DatasetKind,
    pub signals: Vec<Signal>,
}

impl SignalSet {
    pub fn new(kind: DatasetKind, signals: Vec<Signal>) -> Self {
        Self { kind, signals }
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn num_labels(&self) -> Option<usize> {
        self.kind.num_labels()
    }

    pub fn is_labelled(&self) -> bool {
        !self.signals.is_empty() && self.signals.iter().all(|s| s.label.is_some())
    }

    /// Length shared by every signal; models are built for a fixed input size.
    pub fn signal_len(&self) -> Result<usize, SignalError> {
        let expected = self
            .signals
            .first()
            .map(Signal::len)
            .ok_or_else(|| SignalError::Empty(self.kind.to_string()))?;

        match self.signals.iter().find(|s| s.len() != expected) {
            Some(ragged) => Err(SignalError::RaggedLengths {
                expected,
                found: ragged.len(),
            }),
            None => Ok(expected),
        }
    }

    pub fn indices(&self) -> Vec<usize> {
        (0..self.signals.len()).collect()
    }

    pub fn batches<'a>(
        &'a self,
        indices: &'a [usize],
        batch_size: usize,
        device: &'a Device,
    ) -> Batches<'a> {
        Batches::new(&self.signals, indices, batch_size, device)
    }
}
