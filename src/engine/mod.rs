//! Decision engine boundary.
//!
//! Defines the `DecisionEngine` trait — the one capability the harness needs
//! from the engine — and provides the HTTP client for the trading-agents
//! graph service. The engine's internal reasoning is opaque to this crate;
//! tests substitute a deterministic stub.

pub mod graph;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::{Decision, EngineState};

/// Abstraction over decision engines.
///
/// Implementors evaluate a single (ticker, date) work item and return the
/// engine's report-bearing state snapshot plus its final decision, or fail
/// for that item.
#[async_trait]
pub trait DecisionEngine: Send + Sync {
    /// Evaluate one work item.
    async fn invoke(&self, ticker: &str, date: &str) -> Result<(EngineState, Decision)>;

    /// Engine identifier for logging.
    fn name(&self) -> &str;
}
