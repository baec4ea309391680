//! Trading-agents graph service client.
//!
//! Implements the `DecisionEngine` trait against the graph service's HTTP
//! API. Handles request construction, transient-failure retry with
//! exponential backoff, and response parsing. Retry policy lives here, on
//! the engine side of the boundary — the run driver never retries an item.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::DecisionEngine;
use crate::config::{EngineConfig, LlmConfig};
use crate::types::{Decision, EngineState};

/// Maximum retries on rate limit / server errors.
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (ms).
const BASE_BACKOFF_MS: u64 = 1000;

// ---------------------------------------------------------------------------
// API types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct PropagateRequest<'a> {
    ticker: &'a str,
    date: &'a str,
    analysts: &'a [String],
    config: GraphConfig<'a>,
}

/// Engine-side configuration keys, mirroring the graph service's own
/// config mapping.
#[derive(Debug, Serialize)]
struct GraphConfig<'a> {
    llm_provider: &'a str,
    deep_think_llm: &'a str,
    quick_think_llm: &'a str,
    online_tools: bool,
}

#[derive(Debug, Deserialize)]
struct PropagateResponse {
    #[serde(default)]
    state: serde_json::Value,
    #[serde(default)]
    decision: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the trading-agents graph service.
///
/// Constructed once per run, before grid execution begins; a construction
/// failure is fatal to the whole run.
pub struct GraphClient {
    http: Client,
    endpoint: String,
    analysts: Vec<String>,
    llm: LlmConfig,
    online_tools: bool,
}

impl GraphClient {
    pub fn new(
        engine: &EngineConfig,
        llm: &LlmConfig,
        analysts: &[String],
        online_tools: bool,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(engine.timeout_secs))
            .build()
            .context("Failed to build graph service HTTP client")?;

        Ok(Self {
            http,
            endpoint: format!("{}/propagate", engine.endpoint.trim_end_matches('/')),
            analysts: analysts.to_vec(),
            llm: llm.clone(),
            online_tools,
        })
    }

    /// Send a propagate request with retry + backoff.
    async fn call_api(&self, ticker: &str, date: &str) -> Result<PropagateResponse> {
        let request = PropagateRequest {
            ticker,
            date,
            analysts: &self.analysts,
            config: GraphConfig {
                llm_provider: &self.llm.provider,
                deep_think_llm: &self.llm.deep,
                quick_think_llm: &self.llm.quick,
                online_tools: self.online_tools,
            },
        };

        let mut last_error = None;

        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let delay = BASE_BACKOFF_MS * 2u64.pow(attempt - 1);
                debug!(attempt, delay_ms = delay, "Retrying graph service call");
                tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
            }

            let resp = self.http.post(&self.endpoint).json(&request).send().await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return response
                            .json::<PropagateResponse>()
                            .await
                            .context("Failed to parse graph service response");
                    }

                    // Retryable errors: 429 (rate limit), 500+ (server side)
                    if status.as_u16() == 429 || status.as_u16() >= 500 {
                        let error_text = response.text().await.unwrap_or_default();
                        warn!(status = %status, attempt, error = %error_text, "Retryable graph service error");
                        last_error = Some(format!("HTTP {status}: {error_text}"));
                        continue;
                    }

                    // Non-retryable error
                    let error_text = response.text().await.unwrap_or_default();
                    anyhow::bail!("Graph service error {status}: {error_text}");
                }
                Err(e) => {
                    warn!(attempt, error = %e, "Graph service request failed");
                    last_error = Some(format!("Request error: {e}"));
                    continue;
                }
            }
        }

        anyhow::bail!(
            "Graph service failed after {} retries: {}",
            MAX_RETRIES,
            last_error.unwrap_or_default()
        )
    }
}

#[async_trait]
impl DecisionEngine for GraphClient {
    async fn invoke(&self, ticker: &str, date: &str) -> Result<(EngineState, Decision)> {
        let response = self.call_api(ticker, date).await?;
        Ok((EngineState::new(response.state), response.decision))
    }

    fn name(&self) -> &str {
        "trading-agents-graph"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
