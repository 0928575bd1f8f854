//! Error types for the normalization pipeline and batch processor.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the normalizer and the batch processor.
///
/// Configuration errors are raised at construction, before any file is
/// touched. The remaining kinds occur per file and are absorbed into that
/// file's job record by the batch processor.
#[derive(Debug, Error)]
pub enum NormalizerError {
    /// Contradictory or out-of-range configuration options.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// No candidate encoding produced text. The fallback chain ends in a
    /// total decoder, so this exists to keep the decode contract total
    /// rather than as an expected runtime outcome.
    #[error("no supported encoding could decode the input")]
    Decode,

    /// Filesystem failure reading an input file or directory.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Filesystem failure writing an output file or creating its parents.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl NormalizerError {
    /// Shorthand for a read failure at the given path.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Shorthand for a write failure at the given path.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
