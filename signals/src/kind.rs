use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;

use crate::error::SignalError;
use crate::signal::SignalSet;
use crate::sinusoid::SinusoidConfig;
use crate::split::Split;
use crate::{atmosphere, market, nsynth};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum DatasetKind {
    /// Synthetic sums of sinusoids.
    #[value(name = "sin")]
    Sinusoid,
    /// NSynth notes labelled by instrument family.
    #[value(name = "nsynth")]
    NSynth,
    /// Daily market index, one trajectory.
    #[value(name = "marketindex")]
    MarketIndex,
    /// Weekly atmospheric temperature, one trajectory.
    #[value(name = "atmosphere")]
    Atmosphere,
}

impl DatasetKind {
    pub fn num_labels(self) -> Option<usize> {
        match self {
            DatasetKind::NSynth => Some(nsynth::FAMILIES.len()),
            DatasetKind::Sinusoid | DatasetKind::MarketIndex | DatasetKind::Atmosphere => None,
        }
    }

    /// Single-series datasets serve the same trajectory for every split.
    pub fn has_splits(self) -> bool {
        matches!(self, DatasetKind::Sinusoid | DatasetKind::NSynth)
    }

    pub fn load(
        self,
        source: &DataSource,
        split: Split,
        seed: u64,
    ) -> Result<SignalSet, SignalError> {
        match self {
            DatasetKind::Sinusoid => Ok(source
                .sinusoid
                .generate(source.samples_per_split, seed, split)),
            DatasetKind::NSynth => nsynth::load(&source.root, split),
            DatasetKind::MarketIndex => market::load(&source.root),
            DatasetKind::Atmosphere => atmosphere::load(&source.root),
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DatasetKind::Sinusoid => "sin",
            DatasetKind::NSynth => "nsynth",
            DatasetKind::MarketIndex => "marketindex",
            DatasetKind::Atmosphere => "atmosphere",
        };
        f.write_str(name)
    }
}

/// Where dataset files live and how synthetic data is drawn.
#[derive(Clone, Debug)]
pub struct DataSource {
    pub root: PathBuf,
    pub sinusoid: SinusoidConfig,
    /// Synthetic signals generated per split.
    pub samples_per_split: usize,
}

impl DataSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            sinusoid: SinusoidConfig::default(),
            samples_per_split: 1024,
        }
    }
}
