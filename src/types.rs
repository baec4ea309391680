//! Shared types for the TRADEGRID harness.
//!
//! These types form the data model used across all modules: the work grid,
//! the engine boundary, and the episode log records.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Work grid
// ---------------------------------------------------------------------------

/// One (ticker, date) pair to be evaluated by the decision engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub ticker: String,
    /// Trading date in ISO-8601 (`YYYY-MM-DD`) form.
    pub date: String,
}

impl WorkItem {
    pub fn new(ticker: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            date: date.into(),
        }
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ticker, self.date)
    }
}

// ---------------------------------------------------------------------------
// Engine boundary
// ---------------------------------------------------------------------------

/// The engine's final verdict for a work item. Passed through into the
/// episode record verbatim; the harness never inspects it.
pub type Decision = serde_json::Value;

/// The agent-state snapshot returned by the decision engine alongside its
/// decision: a JSON object mapping report names to report bodies.
///
/// Lookups never fail. A missing key, a non-string value, or a non-object
/// state all read as the empty string, so a partially populated state still
/// produces a complete record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineState(serde_json::Value);

impl EngineState {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// A top-level report field, or `""` when absent.
    pub fn report(&self, key: &str) -> String {
        self.0
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    }

    /// The `history` field of a nested debate-state object, or `""` when
    /// either level is absent.
    pub fn debate_history(&self, key: &str) -> String {
        self.0
            .get(key)
            .and_then(|v| v.get("history"))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    }
}

impl From<serde_json::Value> for EngineState {
    fn from(value: serde_json::Value) -> Self {
        Self::new(value)
    }
}

// ---------------------------------------------------------------------------
// Episode records
// ---------------------------------------------------------------------------

/// One line of the `episodes.ndjson` log: the outcome of a single successful
/// engine invocation. Built once, never mutated, persisted immediately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRecord {
    pub run_id: String,
    pub ticker: String,
    pub date: String,
    pub decision: Decision,
    pub market_report: String,
    pub news_report: String,
    pub social_report: String,
    pub fund_report: String,
    pub invest_history: String,
    pub trader_plan: String,
    pub risk_history: String,
    pub risk_decision: String,
    /// Wall-clock seconds spent inside the engine invocation only.
    pub duration_s: f64,
}

impl ResultRecord {
    /// Shape a record from an engine state snapshot. Report fields that the
    /// engine did not populate come through as empty strings.
    pub fn from_state(
        run_id: &str,
        item: &WorkItem,
        state: &EngineState,
        decision: Decision,
        duration_s: f64,
    ) -> Self {
        Self {
            run_id: run_id.to_string(),
            ticker: item.ticker.clone(),
            date: item.date.clone(),
            decision,
            market_report: state.report("market_report"),
            news_report: state.report("news_report"),
            social_report: state.report("sentiment_report"),
            fund_report: state.report("fundamentals_report"),
            invest_history: state.debate_history("investment_debate_state"),
            trader_plan: state.report("trader_investment_decision"),
            risk_history: state.debate_history("risk_debate_state"),
            risk_decision: state.report("final_trade_decision"),
            duration_s,
        }
    }
}

// ---------------------------------------------------------------------------
// Run summary
// ---------------------------------------------------------------------------

/// Counts for one completed grid run. Emitted on the operator channel at the
/// end of the run; the episode log stays the only persisted output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub items_total: usize,
    pub recorded: usize,
    pub failed: usize,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} items: {} recorded, {} failed",
            self.items_total, self.recorded, self.failed,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for TRADEGRID.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("Invalid run_id '{0}': must be non-empty and free of path separators")]
    InvalidRunId(String),

    #[error("Date stride must be positive, got {0}")]
    InvalidStride(u32),

    #[error("Invalid date '{value}': {source}")]
    InvalidDate {
        value: String,
        source: chrono::ParseError,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
