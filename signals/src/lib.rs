pub mod atmosphere;
pub mod batch;
pub mod error;
pub mod kind;
pub mod market;
pub mod nsynth;
pub mod signal;
pub mod sinusoid;
pub mod split;

pub use batch::Batch;
pub use error::SignalError;
pub use kind::{DataSource, DatasetKind};
pub use signal::{Signal, SignalSet};
pub use sinusoid::SinusoidConfig;
pub use split::Split;

/// Evenly spaced points on `[start, end]`, both ends included.
pub fn linspace(start: f32, end: f32, points: usize) -> Vec<f32> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (points - 1) as f32;
            (0..points).map(|i| start + step * i as f32).collect()
        }
    }
}
