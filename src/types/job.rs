//! Per-file processing records for batch runs.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a single file's processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Discovered but not yet picked up
    Pending,
    /// Read/decode/normalize/write in flight
    Running,
    /// Output committed
    Succeeded,
    /// Read, decode, or write failed; cause retained on the job
    Failed,
}

impl JobStatus {
    /// Check whether the job has finished, either way.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Succeeded => write!(f, "succeeded"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Processing record for one file.
///
/// Created when the file is picked up, finalized when its output is written
/// or its failure recorded, then folded into the batch summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileJob {
    /// Unique identifier for this job
    pub id: Uuid,

    /// Source file path
    pub source: PathBuf,

    /// Name of the encoding that decoded the file, once known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,

    /// Decoded input length in chars
    pub input_chars: usize,

    /// Normalized output length in chars
    pub output_chars: usize,

    /// Decoded input word count
    pub input_words: usize,

    /// Normalized output word count
    pub output_words: usize,

    /// Current lifecycle state
    pub status: JobStatus,

    /// Failure cause, when status is failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

impl FileJob {
    /// Create a pending job for the given source file.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: source.into(),
            encoding: None,
            input_chars: 0,
            output_chars: 0,
            input_words: 0,
            output_words: 0,
            status: JobStatus::Pending,
            error: None,
            started_at: None,
            completed_at: None,
            created_at: Utc::now(),
        }
    }

    /// Mark the job as started.
    pub fn start(&mut self) {
        self.status = JobStatus::Running;
        self.started_at = Some(Utc::now());
    }

    /// Mark the job as succeeded.
    pub fn complete(&mut self) {
        self.status = JobStatus::Succeeded;
        self.completed_at = Some(Utc::now());
    }

    /// Mark the job as failed with a cause.
    pub fn fail(&mut self, error: String) {
        self.status = JobStatus::Failed;
        self.error = Some(error);
        self.completed_at = Some(Utc::now());
    }

    /// Wall-clock duration of the job, once finished.
    pub fn duration_ms(&self) -> Option<i64> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some((end - start).num_milliseconds()),
            _ => None,
        }
    }

    /// File name component of the source path.
    pub fn file_name(&self) -> String {
        Path::new(&self.source)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_lifecycle() {
        let mut job = FileJob::new("raw-text/sample.txt");

        assert_eq!(job.status, JobStatus::Pending);
        assert!(!job.status.is_terminal());
        assert!(job.started_at.is_none());

        job.start();
        assert_eq!(job.status, JobStatus::Running);
        assert!(job.started_at.is_some());
        assert!(job.duration_ms().is_none());

        job.complete();
        assert_eq!(job.status, JobStatus::Succeeded);
        assert!(job.status.is_terminal());
        assert!(job.duration_ms().is_some());
    }

    #[test]
    fn test_job_failure_keeps_cause() {
        let mut job = FileJob::new("raw-text/broken.txt");
        job.start();
        job.fail("failed to read raw-text/broken.txt: permission denied".to_string());

        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.error.as_deref().unwrap().contains("permission denied"));
        assert!(job.completed_at.is_some());
    }

    #[test]
    fn test_file_name() {
        let job = FileJob::new("raw-text/nested/sample.txt");
        assert_eq!(job.file_name(), "sample.txt");
        assert_eq!(JobStatus::Failed.to_string(), "failed");
    }
}
