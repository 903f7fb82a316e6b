use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SupervisorError {
    /// NaN or infinite metrics cannot be ordered against the best score.
    #[error("metric {0} is not finite")]
    InvalidMetric(f64),

    #[error("patience must be at least 1 epoch")]
    ZeroPatience,
}
