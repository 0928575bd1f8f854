//! Core types for the normalization service.

mod config;
mod job;
mod stats;

pub use config::{NormalizerConfig, UnicodeForm};
pub use job::{FileJob, JobStatus};
pub use stats::NormalizationStats;
