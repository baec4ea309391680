//! Stub engine for integration testing.
//!
//! Provides a deterministic `DecisionEngine` implementation that returns a
//! known state and decision per (ticker, date), can be forced to fail for
//! specific items, and can omit report fields — all in-memory with no
//! external dependencies.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tradegrid::engine::DecisionEngine;
use tradegrid::types::{Decision, EngineState, WorkItem};

/// A deterministic decision engine for testing the grid driver.
///
/// The returned state embeds the ticker and date, so tests can verify that
/// each record came from the right invocation.
pub struct StubEngine {
    /// Items that fail when invoked.
    failing: Mutex<HashSet<(String, String)>>,
    /// Top-level state keys withheld from every returned state.
    omit_keys: Mutex<HashSet<String>>,
    /// Artificial per-invocation latency.
    latency: Option<Duration>,
    /// Every invocation, in order.
    invocations: Arc<Mutex<Vec<WorkItem>>>,
}

impl StubEngine {
    pub fn new() -> Self {
        Self {
            failing: Mutex::new(HashSet::new()),
            omit_keys: Mutex::new(HashSet::new()),
            latency: None,
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Force a specific (ticker, date) item to fail.
    pub fn fail_on(self, ticker: &str, date: &str) -> Self {
        self.failing
            .lock()
            .unwrap()
            .insert((ticker.to_string(), date.to_string()));
        self
    }

    /// Withhold the given top-level keys from every returned state.
    pub fn omitting(self, keys: &[&str]) -> Self {
        let mut omit = self.omit_keys.lock().unwrap();
        for key in keys {
            omit.insert(key.to_string());
        }
        drop(omit);
        self
    }

    /// Sleep inside every invocation, to make durations observable.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Shared handle to the ordered invocation log.
    pub fn invocation_log(&self) -> Arc<Mutex<Vec<WorkItem>>> {
        Arc::clone(&self.invocations)
    }

    fn state_for(&self, ticker: &str, date: &str) -> serde_json::Value {
        let mut state = json!({
            "market_report": format!("market report for {ticker} on {date}"),
            "news_report": format!("news report for {ticker} on {date}"),
            "sentiment_report": format!("sentiment for {ticker} on {date}"),
            "fundamentals_report": format!("fundamentals for {ticker} on {date}"),
            "investment_debate_state": { "history": format!("debate over {ticker}") },
            "trader_investment_decision": format!("plan for {ticker}"),
            "risk_debate_state": { "history": format!("risk rounds for {ticker}") },
            "final_trade_decision": "BUY",
        });

        let omit = self.omit_keys.lock().unwrap();
        if let Some(map) = state.as_object_mut() {
            map.retain(|key, _| !omit.contains(key));
        }
        state
    }
}

impl Default for StubEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DecisionEngine for StubEngine {
    async fn invoke(&self, ticker: &str, date: &str) -> Result<(EngineState, Decision)> {
        self.invocations
            .lock()
            .unwrap()
            .push(WorkItem::new(ticker, date));

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self
            .failing
            .lock()
            .unwrap()
            .contains(&(ticker.to_string(), date.to_string()))
        {
            return Err(anyhow!("stubbed engine failure for {ticker} {date}"));
        }

        Ok((EngineState::new(self.state_for(ticker, date)), json!("BUY")))
    }

    fn name(&self) -> &str {
        "stub"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_returns_full_state() {
        let engine = StubEngine::new();
        let (state, decision) = engine.invoke("AAA", "2024-01-01").await.unwrap();
        assert_eq!(state.report("market_report"), "market report for AAA on 2024-01-01");
        assert_eq!(state.debate_history("risk_debate_state"), "risk rounds for AAA");
        assert_eq!(decision, json!("BUY"));
    }

    #[tokio::test]
    async fn test_stub_forced_failure() {
        let engine = StubEngine::new().fail_on("BBB", "2024-01-01");
        assert!(engine.invoke("BBB", "2024-01-01").await.is_err());
        assert!(engine.invoke("BBB", "2024-01-02").await.is_ok());
    }

    #[tokio::test]
    async fn test_stub_omits_keys() {
        let engine = StubEngine::new().omitting(&["sentiment_report", "risk_debate_state"]);
        let (state, _) = engine.invoke("AAA", "2024-01-01").await.unwrap();
        assert_eq!(state.report("sentiment_report"), "");
        assert_eq!(state.debate_history("risk_debate_state"), "");
        assert_ne!(state.report("market_report"), "");
    }

    #[tokio::test]
    async fn test_stub_records_invocations() {
        let engine = StubEngine::new();
        let log = engine.invocation_log();
        engine.invoke("AAA", "2024-01-01").await.unwrap();
        engine.invoke("BBB", "2024-01-02").await.ok();
        let items = log.lock().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], WorkItem::new("AAA", "2024-01-01"));
    }
}
