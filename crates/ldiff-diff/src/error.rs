//! Error types for the diff crate.

use std::path::PathBuf;

/// Errors that can occur during diff operations.
///
/// The diff math itself is total; only file access can fail.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// An input file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output file could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
