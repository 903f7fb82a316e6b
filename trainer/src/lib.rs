pub mod checkpoint;
pub mod config;
pub mod device;
pub mod error;
pub mod network;
pub mod tracking;
pub mod training;

pub use checkpoint::CheckpointStore;
pub use config::{Harmonics, Hyperparameters, ModelShape, RunConfig};
pub use device::{get_device, DeviceKind};
pub use error::TrainError;
pub use network::{Model, ModelKind, Task};
pub use tracking::Tracker;
pub use training::{EvalReport, Trainer, TrainingSummary};
