//! Background export runner
//!
//! Builds and writes the archive on a worker thread from an owned snapshot,
//! so the UI keeps drawing while a large export is written. The app polls
//! for completion on each tick.

use super::export::{archive_file_name, build_archive, write_archive};
use crate::error::ExportError;
use crate::model::entry::{Entry, Label, PairKey};
use chrono::Local;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

/// Everything an export needs, detached from the live session
#[derive(Debug, Clone)]
pub struct ExportSnapshot {
    pub entries: Vec<Entry>,
    pub labels: BTreeMap<PairKey, Label>,
    pub out_dir: PathBuf,
}

/// Outcome of a finished export
#[derive(Debug)]
pub struct ExportOutcome {
    pub result: Result<PathBuf, ExportError>,
    pub elapsed: Duration,
}

struct ExportJob {
    receiver: Receiver<Result<PathBuf, ExportError>>,
    started: Instant,
}

/// Runs at most one export at a time
#[derive(Default)]
pub struct ExportRunner {
    job: Option<ExportJob>,
}

impl ExportRunner {
    pub fn new() -> Self {
        Self { job: None }
    }

    pub fn is_running(&self) -> bool {
        self.job.is_some()
    }

    /// Start exporting `snapshot`. Returns false if an export is already running.
    pub fn spawn(&mut self, snapshot: ExportSnapshot) -> bool {
        if self.job.is_some() {
            return false;
        }

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(Self::run(snapshot));
        });

        self.job = Some(ExportJob {
            receiver: rx,
            started: Instant::now(),
        });
        true
    }

    /// Check for completion without blocking
    pub fn poll(&mut self) -> Option<ExportOutcome> {
        let job = self.job.as_ref()?;

        let result = match job.receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(ExportError::ArchiveBuild(
                "export worker stopped unexpectedly".to_string(),
            )),
        };

        let elapsed = job.started.elapsed();
        self.job = None;
        Some(ExportOutcome { result, elapsed })
    }

    fn run(snapshot: ExportSnapshot) -> Result<PathBuf, ExportError> {
        let archive = build_archive(&snapshot.entries, &snapshot.labels)?;
        let file_name = archive_file_name(Local::now());
        write_archive(&snapshot.out_dir, &file_name, &archive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn wait_for(runner: &mut ExportRunner) -> ExportOutcome {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(outcome) = runner.poll() {
                return outcome;
            }
            assert!(Instant::now() < deadline, "export did not finish");
            thread::sleep(Duration::from_millis(5));
        }
    }

    fn snapshot(out_dir: PathBuf, labels: &[(&str, i64)]) -> ExportSnapshot {
        let entry: Entry = serde_json::from_value(json!({
            "goal_image": "0000_goal.jpg",
            "current_image": "0000_current.jpg",
            "caption1_text": "a",
            "caption2_text": "b",
            "caption1_index": 0,
            "caption2_index": 1,
        }))
        .unwrap();
        ExportSnapshot {
            entries: vec![entry],
            labels: labels
                .iter()
                .map(|(k, v)| (PairKey::from(*k), Label(*v)))
                .collect(),
            out_dir,
        }
    }

    #[test]
    fn test_export_runs_in_background_and_writes_zip() {
        let dir = TempDir::new().unwrap();
        let mut runner = ExportRunner::new();

        assert!(runner.spawn(snapshot(dir.path().to_path_buf(), &[("0000", 1)])));
        let outcome = wait_for(&mut runner);

        let path = outcome.result.unwrap();
        assert!(path.exists());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("zip"));
        assert!(!runner.is_running());
    }

    #[test]
    fn test_empty_export_reports_error() {
        let dir = TempDir::new().unwrap();
        let mut runner = ExportRunner::new();

        runner.spawn(snapshot(dir.path().to_path_buf(), &[]));
        let outcome = wait_for(&mut runner);

        assert!(matches!(outcome.result, Err(ExportError::Empty)));
    }

    #[test]
    fn test_poll_without_job_is_none() {
        let mut runner = ExportRunner::new();
        assert!(runner.poll().is_none());
    }
}
