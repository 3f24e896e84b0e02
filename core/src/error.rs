use std::path::PathBuf;

use thiserror::Error;

/// Failure to produce a complete catalog. Always fatal at startup.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("country data file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read country data file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse country data: {source}")]
    Parse {
        #[from]
        source: serde_json::Error,
    },
    #[error("invalid country record #{index}: {reason}")]
    Invalid { index: usize, reason: String },
    #[error("country data contains no records")]
    Empty,
}

impl DataLoadError {
    pub(crate) fn invalid(index: usize, reason: impl Into<String>) -> Self {
        Self::Invalid {
            index,
            reason: reason.into(),
        }
    }
}

/// Per-guess failure. The round is left as it was and the player may retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuessError {
    #[error("unknown country: {guess}")]
    UnknownCountry { guess: String },
}
