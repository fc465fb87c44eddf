use std::path::PathBuf;

use ldiff_types::ParseError;

/// Errors that can occur while comparing LDIF files.
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    /// A file could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record could not be parsed and the parse policy is `Abort`.
    #[error("parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A result could not be encoded as JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CompareError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias for comparison results.
pub type CompareResult<T> = Result<T, CompareError>;
