//! Progress reporting for batch runs.
//!
//! The batch processor emits one [`ProgressEvent`] per finished file and
//! stays free of any rendering concern; observers decide whether events
//! become log lines, progress bars, or nothing at all.

use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::types::JobStatus;

/// A snapshot of batch progress, emitted after each file completes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEvent {
    /// File name of the job that just finished
    pub file: String,
    /// Outcome of that job
    pub status: JobStatus,
    /// Files finished so far, including this one
    pub files_completed: usize,
    /// Files discovered for this run
    pub files_total: usize,
    /// Completion percentage in `[0, 100]`
    pub percent: f64,
    /// Wall-clock seconds since the run started
    pub elapsed_secs: f64,
    /// Estimated seconds remaining, assuming the observed per-file pace
    pub eta_secs: f64,
    /// Cumulative input characters per elapsed second
    pub chars_per_sec: f64,
    /// Input characters read so far
    pub input_chars_total: usize,
    /// Output characters written so far
    pub output_chars_total: usize,
}

impl ProgressEvent {
    /// Build an event, deriving percent, ETA and throughput.
    pub fn new(
        file: String,
        status: JobStatus,
        files_completed: usize,
        files_total: usize,
        input_chars_total: usize,
        output_chars_total: usize,
        elapsed: Duration,
    ) -> Self {
        let elapsed_secs = elapsed.as_secs_f64();
        let percent = if files_total == 0 {
            100.0
        } else {
            files_completed as f64 / files_total as f64 * 100.0
        };
        let eta_secs = if files_completed == 0 {
            0.0
        } else {
            let remaining = files_total.saturating_sub(files_completed);
            elapsed_secs / files_completed as f64 * remaining as f64
        };
        let chars_per_sec = if elapsed_secs > 0.0 {
            input_chars_total as f64 / elapsed_secs
        } else {
            0.0
        };
        Self {
            file,
            status,
            files_completed,
            files_total,
            percent,
            elapsed_secs,
            eta_secs,
            chars_per_sec,
            input_chars_total,
            output_chars_total,
        }
    }
}

/// Receives progress events from a batch run.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);
}

/// Observer that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl ProgressObserver for NullObserver {
    fn on_progress(&self, _event: &ProgressEvent) {}
}

/// Observer that renders each event as a structured log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ProgressObserver for LogObserver {
    fn on_progress(&self, event: &ProgressEvent) {
        info!(
            file = %event.file,
            status = %event.status,
            completed = event.files_completed,
            total = event.files_total,
            percent = %format!("{:.1}", event.percent),
            eta_secs = %format!("{:.1}", event.eta_secs),
            chars_per_sec = %format!("{:.0}", event.chars_per_sec),
            "Progress"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_eta_extrapolates_observed_pace() {
        let event = ProgressEvent::new(
            "a.txt".to_string(),
            JobStatus::Succeeded,
            2,
            10,
            4000,
            3000,
            Duration::from_secs(4),
        );
        assert_eq!(event.percent, 20.0);
        assert_eq!(event.eta_secs, 16.0);
        assert_eq!(event.chars_per_sec, 1000.0);
    }

    #[test]
    fn test_first_event_has_no_eta_before_completions() {
        let event = ProgressEvent::new(
            "a.txt".to_string(),
            JobStatus::Failed,
            0,
            5,
            0,
            0,
            Duration::from_secs(1),
        );
        assert_eq!(event.eta_secs, 0.0);
        assert_eq!(event.percent, 0.0);
    }

    #[test]
    fn test_zero_elapsed_reports_zero_throughput() {
        let event = ProgressEvent::new(
            "a.txt".to_string(),
            JobStatus::Succeeded,
            1,
            1,
            500,
            400,
            Duration::ZERO,
        );
        assert_eq!(event.chars_per_sec, 0.0);
        assert_eq!(event.percent, 100.0);
        assert_eq!(event.eta_secs, 0.0);
    }

    #[test]
    fn test_observers_accept_events() {
        let event = ProgressEvent::new(
            "a.txt".to_string(),
            JobStatus::Succeeded,
            1,
            2,
            100,
            90,
            Duration::from_millis(50),
        );
        let observers: [&dyn ProgressObserver; 2] = [&NullObserver, &LogObserver];
        for observer in observers {
            observer.on_progress(&event);
        }
    }
}
