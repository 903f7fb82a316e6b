use std::path::PathBuf;

use clap::Parser;
use signals::DatasetKind;
use trainer::{DeviceKind, ModelKind};

#[derive(Parser, Debug, Clone)]
#[command(name = "Signal Trainer")]
#[command(author = "Jørgen Hanssen <jorgen@hanssen.io>")]
#[command(version = "0.1.0")]
pub struct Args {
    /// Dataset to train on.
    #[arg(long, value_enum, default_value_t = DatasetKind::Sinusoid)]
    pub dataset: DatasetKind,

    /// Model architecture.
    #[arg(long, value_enum, default_value_t = ModelKind::Fourier)]
    pub model: ModelKind,

    /// Directory holding the dataset files.
    #[arg(long, default_value = "data")]
    pub dataset_path: PathBuf,

    /// Directory runs are written to.
    #[arg(long, default_value = "runs")]
    pub output_dir: PathBuf,

    /// Run directory name. Defaults to `<dataset>_<model>`.
    #[arg(long)]
    pub run_name: Option<String>,

    /// Initial learning rate for optimizer.
    #[arg(long, default_value_t = 0.001)]
    pub learning_rate: f64,

    /// Learning rate decay factor per epoch.
    #[arg(long, default_value_t = 1.0)]
    pub lr_decay: f64,

    /// Maximum number of training epochs.
    #[arg(long, default_value_t = 100)]
    pub epochs: usize,

    /// Number of signals per training batch.
    #[arg(long, default_value_t = 128)]
    pub batch_size: usize,

    /// Epochs without improvement before early stopping.
    #[arg(long, default_value_t = 20)]
    pub patience: u32,

    #[arg(long, default_value_t = 1234)]
    pub seed: u64,

    #[arg(long, value_enum, default_value_t = DeviceKind::Cpu)]
    pub device: DeviceKind,

    #[arg(long, default_value_t = 0)]
    pub device_ordinal: usize,

    /// Synthetic signals generated per split.
    #[arg(long, default_value_t = 1024)]
    pub samples: usize,

    /// Number of Fourier harmonics.
    #[arg(long, default_value_t = 50)]
    pub n_harmonics: u32,

    /// Lowest harmonic.
    #[arg(long, default_value_t = 1)]
    pub lower_bound: u32,

    /// Highest harmonic. Defaults to `lower_bound + n_harmonics - 1`.
    #[arg(long)]
    pub upper_bound: Option<u32>,

    /// Width of the Fourier encoder.
    #[arg(long, default_value_t = 512)]
    pub hidden_dim: usize,

    /// Debug logging and per-epoch patience reports.
    #[arg(long)]
    pub verbose: bool,

    /// Ignore an existing checkpoint instead of resuming from it.
    #[arg(long)]
    pub fresh: bool,
}

impl Args {
    pub fn run_name(&self) -> String {
        self.run_name.clone().unwrap_or_else(|| {
            let model = format!("{:?}", self.model).to_lowercase();
            format!("{}_{}", self.dataset, model)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["train"]);
        assert_eq!(args.dataset, DatasetKind::Sinusoid);
        assert_eq!(args.model, ModelKind::Fourier);
        assert_eq!(args.run_name(), "sin_fourier");
        assert!(!args.fresh);
    }

    #[test]
    fn test_value_names() {
        let args = Args::parse_from([
            "train",
            "--dataset",
            "nsynth",
            "--model",
            "conv",
            "--device",
            "cuda",
            "--upper-bound",
            "60",
            "--fresh",
        ]);
        assert_eq!(args.dataset, DatasetKind::NSynth);
        assert_eq!(args.model, ModelKind::Conv);
        assert_eq!(args.device, DeviceKind::Cuda);
        assert_eq!(args.upper_bound, Some(60));
        assert_eq!(args.run_name(), "nsynth_conv");
        assert!(args.fresh);
    }

    #[test]
    fn test_rejects_unknown_dataset() {
        assert!(Args::try_parse_from(["train", "--dataset", "ecg"]).is_err());
    }
}
