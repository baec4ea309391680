//! Grid run driver.
//!
//! Walks the work grid in order, invoking the decision engine once per
//! (ticker, date) item and recording each outcome. A failure inside one item
//! is isolated to that item: it is reported once on the operator channel and
//! the grid continues. The engine instance is constructed before the run
//! starts; engine construction failure is fatal to the whole run.

use anyhow::Result;
use std::time::Instant;
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::engine::DecisionEngine;
use crate::grid;
use crate::recorder::EpisodeRecorder;
use crate::types::{ResultRecord, RunReport, WorkItem};

/// Sequential driver for one experiment grid.
///
/// Holds exactly one live engine instance and one recorder for the whole
/// run. Items are processed strictly one at a time: invocation, timing,
/// record build, and persistence all complete before the next item starts.
pub struct GridRunner {
    config: RunConfig,
    engine: Box<dyn DecisionEngine>,
    recorder: EpisodeRecorder,
}

impl GridRunner {
    pub fn new(config: RunConfig, engine: Box<dyn DecisionEngine>, recorder: EpisodeRecorder) -> Self {
        Self {
            config,
            engine,
            recorder,
        }
    }

    /// Run the full grid once, returning the success/failure counts.
    ///
    /// Per-item failures never propagate; the only errors returned here come
    /// from grid enumeration itself. The episode log is the ground truth for
    /// which items succeeded — a failed item simply has no line.
    pub async fn run(&self) -> Result<RunReport> {
        info!(
            run_id = %self.config.run_id,
            engine = self.engine.name(),
            tickers = self.config.tickers.len(),
            log = %self.recorder.log_path().display(),
            "Starting grid run"
        );

        let mut report = RunReport::default();

        for item in grid::work_items(&self.config)? {
            report.items_total += 1;
            match self.process_item(&item).await {
                Ok(()) => report.recorded += 1,
                Err(e) => {
                    warn!(
                        ticker = %item.ticker,
                        date = %item.date,
                        error = %e,
                        "Work item failed — skipping"
                    );
                    report.failed += 1;
                }
            }
        }

        info!(
            items = report.items_total,
            recorded = report.recorded,
            failed = report.failed,
            "Grid run complete"
        );

        Ok(report)
    }

    /// Process a single work item: invoke, time, shape, persist.
    ///
    /// Wall-clock duration covers the engine invocation only, not record
    /// construction or the append.
    async fn process_item(&self, item: &WorkItem) -> Result<()> {
        let started = Instant::now();
        let (state, decision) = self.engine.invoke(&item.ticker, &item.date).await?;
        let duration_s = started.elapsed().as_secs_f64();

        let record =
            ResultRecord::from_state(&self.config.run_id, item, &state, decision, duration_s);
        self.recorder.append(&record)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
