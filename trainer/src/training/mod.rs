mod evaluation;
mod progress;
mod trainer;

pub use evaluation::{evaluate, EvalReport};
pub use progress::TrainingProgressBar;
pub use trainer::{Trainer, TrainingSummary};
