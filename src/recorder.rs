//! Episode log persistence.
//!
//! Appends one JSON line per completed work item to the run-scoped
//! `episodes.ndjson` log. The file is opened in append mode for every write
//! and closed again, so an interrupted run leaves the log consistent up to
//! the last completed append. Nothing here ever truncates or rewrites.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::types::ResultRecord;

const LOG_FILE: &str = "episodes.ndjson";

/// Append-only recorder for one run's output scope.
pub struct EpisodeRecorder {
    run_dir: PathBuf,
}

impl EpisodeRecorder {
    /// Create the recorder for `<results_root>/<run_id>/`, creating the
    /// directory (with parents) if needed. Safe to call for an existing run
    /// directory; an earlier log is appended to, never replaced.
    pub fn create(results_root: &Path, run_id: &str) -> Result<Self> {
        let run_dir = results_root.join(run_id);
        fs::create_dir_all(&run_dir)
            .with_context(|| format!("Failed to create run directory: {}", run_dir.display()))?;
        Ok(Self { run_dir })
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    pub fn log_path(&self) -> PathBuf {
        self.run_dir.join(LOG_FILE)
    }

    /// Serialize `record` to a single line and append it to the log.
    ///
    /// Each call is a self-contained write: open in append mode, write the
    /// full line including the trailing newline, close. No state is buffered
    /// across calls.
    pub fn append(&self, record: &ResultRecord) -> Result<()> {
        let mut line =
            serde_json::to_string(record).context("Failed to serialise episode record")?;
        line.push('\n');

        let path = self.log_path();
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .with_context(|| format!("Failed to open episode log: {}", path.display()))?;
        file.write_all(line.as_bytes())
            .with_context(|| format!("Failed to append to episode log: {}", path.display()))?;
        file.flush()
            .with_context(|| format!("Failed to flush episode log: {}", path.display()))?;

        debug!(ticker = %record.ticker, date = %record.date, "Episode recorded");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
