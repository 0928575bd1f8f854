//! Batch normalization of text corpora on disk.
//!
//! The processor walks an input directory, decodes each supported file
//! through the encoding fallback chain, runs the normalization pipeline,
//! and writes results into a mirrored output tree. One broken file never
//! stops a run: per-file failures are recorded on the run summary while
//! the remaining files continue.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::encoding;
use crate::error::NormalizerError;
use crate::pipeline::Normalizer;
use crate::progress::{NullObserver, ProgressEvent, ProgressObserver};
use crate::types::{FileJob, JobStatus, NormalizerConfig};
use crate::{DEFAULT_CONCURRENCY, SUPPORTED_EXTENSIONS};

/// Tuning knobs for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Maximum files decoded and normalized concurrently
    pub concurrency: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl BatchOptions {
    /// Read options from `SUDANORM_*` environment variables, falling back
    /// to defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let concurrency = std::env::var("SUDANORM_CONCURRENCY")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_CONCURRENCY);
        Self { concurrency }
    }
}

/// A file the run could not process.
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    /// Source path of the failed file
    pub path: PathBuf,
    /// Human-readable failure reason
    pub error: String,
}

/// Aggregate outcome of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub files_discovered: usize,
    pub files_succeeded: usize,
    pub files_failed: usize,
    /// Characters read from successfully processed files
    pub total_input_chars: usize,
    /// Characters written for successfully processed files
    pub total_output_chars: usize,
    pub total_input_words: usize,
    pub total_output_words: usize,
    pub elapsed_ms: u64,
    pub failures: Vec<BatchFailure>,
}

impl BatchSummary {
    fn new(files_discovered: usize) -> Self {
        Self {
            files_discovered,
            files_succeeded: 0,
            files_failed: 0,
            total_input_chars: 0,
            total_output_chars: 0,
            total_input_words: 0,
            total_output_words: 0,
            elapsed_ms: 0,
            failures: Vec::new(),
        }
    }

    /// Fraction of input characters removed by normalization, in `[0, 1]`.
    pub fn compression_ratio(&self) -> f64 {
        if self.total_input_chars > 0 {
            1.0 - self.total_output_chars as f64 / self.total_input_chars as f64
        } else {
            0.0
        }
    }

    /// Input characters processed per second of wall-clock time.
    pub fn chars_per_second(&self) -> f64 {
        if self.elapsed_ms > 0 {
            self.total_input_chars as f64 / (self.elapsed_ms as f64 / 1000.0)
        } else {
            0.0
        }
    }

    /// Whether every discovered file was processed.
    pub fn is_complete_success(&self) -> bool {
        self.files_failed == 0
    }

    fn absorb(&mut self, job: &FileJob) {
        match job.status {
            JobStatus::Succeeded => {
                self.files_succeeded += 1;
                self.total_input_chars += job.input_chars;
                self.total_output_chars += job.output_chars;
                self.total_input_words += job.input_words;
                self.total_output_words += job.output_words;
            }
            _ => {
                self.files_failed += 1;
                self.failures.push(BatchFailure {
                    path: job.source.clone(),
                    error: job.error.clone().unwrap_or_default(),
                });
            }
        }
    }
}

/// Discovers, decodes, normalizes and rewrites a corpus directory.
pub struct BatchProcessor {
    normalizer: Normalizer,
    options: BatchOptions,
    observer: Arc<dyn ProgressObserver>,
}

impl BatchProcessor {
    /// Create a processor with default options and no progress reporting.
    pub fn new(config: NormalizerConfig) -> Result<Self, NormalizerError> {
        Ok(Self {
            normalizer: Normalizer::new(config)?,
            options: BatchOptions::default(),
            observer: Arc::new(NullObserver),
        })
    }

    pub fn with_options(mut self, options: BatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// The normalizer this processor runs.
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Normalize every supported file under `input_dir` into `output_dir`.
    ///
    /// The output tree mirrors the input tree, including nested
    /// directories. Only setup problems abort the run with an error: an
    /// unreadable input directory or an uncreatable output root. Anything
    /// that goes wrong with an individual file is absorbed into the
    /// summary's failure list instead.
    pub async fn process_all(
        &self,
        input_dir: &Path,
        output_dir: &Path,
    ) -> Result<BatchSummary, NormalizerError> {
        let started = Instant::now();

        let files = discover_files(input_dir).await?;
        info!(
            count = files.len(),
            input = %input_dir.display(),
            "Discovered input files"
        );

        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|e| NormalizerError::write(output_dir, e))?;

        let total = files.len();
        let mut summary = BatchSummary::new(total);

        let mut jobs = stream::iter(files)
            .map(|path| self.process_file(path, input_dir, output_dir))
            .buffered(self.options.concurrency.max(1));

        let mut completed = 0usize;
        while let Some(job) = jobs.next().await {
            completed += 1;
            summary.absorb(&job);
            let event = ProgressEvent::new(
                job.file_name(),
                job.status,
                completed,
                total,
                summary.total_input_chars,
                summary.total_output_chars,
                started.elapsed(),
            );
            self.observer.on_progress(&event);
        }

        summary.elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            succeeded = summary.files_succeeded,
            failed = summary.files_failed,
            elapsed_ms = summary.elapsed_ms,
            "Batch complete"
        );
        Ok(summary)
    }

    /// Run one file end to end. Failures land on the returned job record,
    /// never as an error.
    async fn process_file(&self, path: PathBuf, input_dir: &Path, output_dir: &Path) -> FileJob {
        let mut job = FileJob::new(path.clone());
        job.start();
        match self.normalize_file(&path, input_dir, output_dir, &mut job).await {
            Ok(()) => job.complete(),
            Err(e) => {
                warn!(file = %path.display(), error = %e, "File failed");
                job.fail(e.to_string());
            }
        }
        job
    }

    async fn normalize_file(
        &self,
        path: &Path,
        input_dir: &Path,
        output_dir: &Path,
        job: &mut FileJob,
    ) -> Result<(), NormalizerError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| NormalizerError::read(path, e))?;
        let decoded = encoding::decode_bytes(&bytes)?;
        job.encoding = Some(decoded.encoding.to_string());
        debug!(file = %path.display(), encoding = decoded.encoding, "Decoded input");

        let (normalized, stats) = self.normalizer.normalize_with_stats(&decoded.text);
        job.input_chars = stats.original_length;
        job.output_chars = stats.normalized_length;
        job.input_words = stats.original_words;
        job.output_words = stats.normalized_words;

        let target = output_path(path, input_dir, output_dir);
        write_atomic(&target, &normalized).await
    }
}

/// Walk `root` and collect supported files, sorted for a stable run order.
async fn discover_files(root: &Path) -> Result<Vec<PathBuf>, NormalizerError> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| NormalizerError::read(&dir, e))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| NormalizerError::read(&dir, e))?
        {
            let path = entry.path();
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| NormalizerError::read(&path, e))?;
            if file_type.is_dir() {
                pending.push(path);
            } else if is_supported(&path) {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.iter().any(|s| e.eq_ignore_ascii_case(s)))
        .unwrap_or(false)
}

/// Mirror `path`'s position under `input_dir` into `output_dir`.
fn output_path(path: &Path, input_dir: &Path, output_dir: &Path) -> PathBuf {
    match path.strip_prefix(input_dir) {
        Ok(rel) => output_dir.join(rel),
        Err(_) => output_dir.join(path.file_name().unwrap_or_default()),
    }
}

/// Write through a temp sibling and rename, so readers never observe a
/// half-written output file.
async fn write_atomic(target: &Path, contents: &str) -> Result<(), NormalizerError> {
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| NormalizerError::write(parent, e))?;
    }
    let tmp = temp_sibling(target);
    tokio::fs::write(&tmp, contents)
        .await
        .map_err(|e| NormalizerError::write(&tmp, e))?;
    if let Err(e) = tokio::fs::rename(&tmp, target).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(NormalizerError::write(target, e));
    }
    Ok(())
}

fn temp_sibling(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    target.with_file_name(name)
}
