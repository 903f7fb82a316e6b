use std::io;
use std::path::PathBuf;

use signals::SignalError;
use supervisor::SupervisorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrainError {
    #[error(transparent)]
    Candle(#[from] candle_core::Error),

    #[error(transparent)]
    Signal(#[from] SignalError),

    #[error(transparent)]
    Supervisor(#[from] SupervisorError),

    #[error(transparent)]
    Template(#[from] indicatif::style::TemplateError),

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("checkpoint {0} has no stored best score")]
    MissingScore(PathBuf),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl TrainError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TrainError::Io {
            path: path.into(),
            source,
        }
    }
}
