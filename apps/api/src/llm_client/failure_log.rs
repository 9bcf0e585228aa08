//! Append-only, operator-facing log of failed dispatch candidates.
//!
//! One line per failure, written with a single `O_APPEND` write so concurrent
//! dispatches never interleave partial lines. Write errors are reported via
//! `tracing` and otherwise ignored: logging must never abort a dispatch.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

/// Error text longer than this is cut in the log line.
const MAX_ERROR_CHARS: usize = 500;

/// One failed (credential, model) attempt. Never carries the raw key.
#[derive(Debug, Clone, Serialize)]
pub struct FailureRecord {
    pub dispatch_id: Uuid,
    pub credential_index: usize,
    pub model: String,
    pub error: String,
    pub at: DateTime<Utc>,
}

impl FailureRecord {
    pub fn new(
        dispatch_id: Uuid,
        credential_index: usize,
        model: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            dispatch_id,
            credential_index,
            model: model.into(),
            error: error.into(),
            at: Utc::now(),
        }
    }

    /// `2025-01-01T00:00:00Z dispatch=<id> key#0 model=<id> error=<summary>\n`
    pub fn to_log_line(&self) -> String {
        let error: String = self
            .error
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .take(MAX_ERROR_CHARS)
            .collect();
        format!(
            "{} dispatch={} key#{} model={} error={}\n",
            self.at.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.dispatch_id,
            self.credential_index,
            self.model,
            error
        )
    }
}

/// Handle to the failure log file. Cheap to clone; `disabled()` drops records.
#[derive(Debug, Clone, Default)]
pub struct FailureLog {
    path: Option<Arc<PathBuf>>,
}

impl FailureLog {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(Arc::new(path.into())),
        }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub async fn append(&self, record: &FailureRecord) {
        let Some(path) = self.path.clone() else {
            return;
        };
        let line = record.to_log_line();
        let result =
            tokio::task::spawn_blocking(move || append_line(&path, line.as_bytes())).await;
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Could not write LLM failure log: {e}"),
            Err(e) => warn!("LLM failure log task failed: {e}"),
        }
    }
}

fn append_line(path: &Path, line: &[u8]) -> std::io::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    file.write_all(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(index: usize, error: &str) -> FailureRecord {
        FailureRecord::new(Uuid::nil(), index, "google/gemini-pro-1.5", error)
    }

    #[test]
    fn test_log_line_format() {
        let line = record(1, "API error (status 429): rate limited").to_log_line();
        assert!(line.ends_with('\n'));
        assert!(line.contains(" dispatch=00000000-0000-0000-0000-000000000000 "));
        assert!(line.contains(" key#1 model=google/gemini-pro-1.5 "));
        assert!(line.contains("error=API error (status 429): rate limited"));
    }

    #[test]
    fn test_multiline_error_stays_on_one_line() {
        let line = record(0, "first\nsecond\r\nthird").to_log_line();
        assert_eq!(line.matches('\n').count(), 1);
    }

    #[test]
    fn test_long_error_is_truncated() {
        let long = "x".repeat(MAX_ERROR_CHARS * 2);
        let line = record(0, &long).to_log_line();
        assert!(line.len() < MAX_ERROR_CHARS + 200);
    }

    #[tokio::test]
    async fn test_append_creates_file_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("failures.log");
        let log = FailureLog::at(&path);

        log.append(&record(0, "timeout")).await;
        log.append(&record(1, "bad json")).await;

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("key#0"));
        assert!(lines[1].contains("key#1"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_appends_never_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("failures.log");
        let log = FailureLog::at(&path);
        let noisy = "upstream said: ".to_string() + &"overloaded ".repeat(40);

        let tasks: Vec<_> = (0..200)
            .map(|index| {
                let log = log.clone();
                let error = noisy.clone();
                tokio::spawn(async move { log.append(&record(index, &error)).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 200);

        let mut indexes: Vec<usize> = lines
            .iter()
            .map(|line| {
                assert!(line.contains(" dispatch=00000000-0000-0000-0000-000000000000 "));
                assert!(line.contains(" model=google/gemini-pro-1.5 error=upstream said: "));
                assert!(line.trim_end().ends_with("overloaded"));
                let key = line.split(" key#").nth(1).unwrap();
                key.split(' ').next().unwrap().parse().unwrap()
            })
            .collect();
        indexes.sort_unstable();
        assert_eq!(indexes, (0..200).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_unwritable_path_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending.
        let log = FailureLog::at(dir.path());
        log.append(&record(0, "ignored")).await;
    }

    #[tokio::test]
    async fn test_disabled_log_is_noop() {
        let log = FailureLog::disabled();
        assert!(log.path.is_none());
        log.append(&record(0, "ignored")).await;
    }
}
