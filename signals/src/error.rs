use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid metadata in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Wav {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("{path} holds {found} samples, expected at least {needed}")]
    Truncated {
        path: PathBuf,
        needed: usize,
        found: usize,
    },

    #[error("{path}:{line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("{0} contains no usable samples")]
    Empty(String),

    #[error("signals have different lengths ({expected} vs {found})")]
    RaggedLengths { expected: usize, found: usize },

    #[error(transparent)]
    Tensor(#[from] candle_core::Error),
}

impl SignalError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SignalError::Io {
            path: path.into(),
            source,
        }
    }
}
