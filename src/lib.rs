//! Sudanese Arabic Text Normalizer
//!
//! A production-ready normalization library for Sudanese Arabic dialect text.
//! Folds letter variants, strips diacritics and transcription noise, tames
//! character repetition, and batch-rewrites whole corpus directories while
//! transparently decoding legacy Arabic encodings.

pub mod batch;
pub mod encoding;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod types;

pub use types::{FileJob, JobStatus, NormalizationStats, NormalizerConfig, UnicodeForm};
pub use pipeline::{Normalizer, Stage};
pub use encoding::{decode_bytes, DecodedText, TextEncoding};
pub use progress::{LogObserver, NullObserver, ProgressEvent, ProgressObserver};
pub use batch::{BatchFailure, BatchOptions, BatchProcessor, BatchSummary};
pub use error::NormalizerError;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::types::*;
    pub use crate::pipeline::{Normalizer, Stage};
    pub use crate::encoding::decode_bytes;
    pub use crate::progress::{LogObserver, ProgressObserver};
    pub use crate::batch::*;
    pub use crate::error::NormalizerError;
}

/// Default cap on repeated grapheme runs
pub const DEFAULT_MAX_CHAR_REPEAT: usize = 2;

/// Default number of files processed concurrently
pub const DEFAULT_CONCURRENCY: usize = 1;

/// File extensions the batch processor picks up
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "text", "md", "csv"];

/// Default input directory for the command-line binary
pub const DEFAULT_INPUT_DIR: &str = "raw-text";

/// Default output directory for the command-line binary
pub const DEFAULT_OUTPUT_DIR: &str = "normalized-text";
