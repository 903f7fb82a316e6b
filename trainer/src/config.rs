use std::path::PathBuf;

use candle_core::Device;

use crate::error::TrainError;

/// Process-wide settings resolved once at startup and handed to every
/// component, instead of global seeding or device environment variables.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub seed: u64,
    pub device: Device,
    pub output_dir: PathBuf,
    pub run_name: String,
    pub verbose: bool,
}

impl RunConfig {
    pub fn run_dir(&self) -> PathBuf {
        self.output_dir.join(&self.run_name)
    }

    pub fn checkpoint_path(&self) -> PathBuf {
        self.run_dir().join("model.safetensors")
    }

    /// Seeds the accelerator RNG used for weight initialisation.
    /// The CPU backend has no seedable generator.
    pub fn seed_device(&self) -> Result<(), TrainError> {
        if !self.device.is_cpu() {
            self.device.set_seed(self.seed)?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hyperparameters {
    pub learning_rate: f64,
    /// Multiplier applied to the learning rate after every epoch.
    pub lr_decay: f64,
    /// Epoch budget, enforced by the loop independently of early stopping.
    pub epochs: usize,
    pub batch_size: usize,
    pub patience: u32,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            learning_rate: 1e-3,
            lr_decay: 1.0,
            epochs: 100,
            batch_size: 128,
            patience: 20,
        }
    }
}

/// Integer harmonic range `lower..=upper` used by the Fourier decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Harmonics {
    pub lower: u32,
    pub upper: u32,
}

impl Harmonics {
    pub fn new(count: u32, lower: u32, upper: Option<u32>) -> Result<Self, TrainError> {
        if count == 0 {
            return Err(TrainError::Config("at least one harmonic is required".into()));
        }
        if lower == 0 {
            return Err(TrainError::Config("harmonics start at 1".into()));
        }

        let upper = match upper {
            Some(upper) => upper,
            None => lower.checked_add(count - 1).ok_or_else(|| {
                TrainError::Config(format!(
                    "{} harmonics starting at {} overflow the harmonic range",
                    count, lower
                ))
            })?,
        };
        if upper < lower || upper - lower + 1 != count {
            return Err(TrainError::Config(format!(
                "{} harmonics do not fit the range {}..={}",
                count, lower, upper
            )));
        }

        Ok(Self { lower, upper })
    }

    pub fn count(&self) -> usize {
        (self.upper - self.lower + 1) as usize
    }
}

impl Default for Harmonics {
    fn default() -> Self {
        Self { lower: 1, upper: 1 }
    }
}

/// Everything a model needs to know about its data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelShape {
    pub input_len: usize,
    pub num_labels: Option<usize>,
    pub hidden_dim: usize,
    pub harmonics: Harmonics,
}
