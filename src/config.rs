//! Run configuration loading from TOML.
//!
//! Reads the config file named on the command line and deserializes it into
//! strongly-typed structs. The configuration is loaded and validated once at
//! process start and is read-only for the rest of the run.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::types::GridError;

/// Top-level run configuration: one experiment grid.
#[derive(Debug, Deserialize, Clone)]
pub struct RunConfig {
    /// Unique per run; keys the output directory under the results root.
    pub run_id: String,
    /// Symbols to evaluate, in the order they should be walked.
    pub tickers: Vec<String>,
    pub dates: DatesConfig,
    /// Analyst-role identifiers forwarded opaquely to the engine.
    pub analysts: Vec<String>,
    pub llm: LlmConfig,
    #[serde(default = "default_online_tools")]
    pub online_tools: bool,
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Inclusive date range walked forward by `stride_days`.
#[derive(Debug, Deserialize, Clone)]
pub struct DatesConfig {
    pub start: String,
    pub end: String,
    #[serde(default = "default_stride")]
    pub stride_days: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    pub provider: String,
    /// Model identifier for the deep-think tier.
    pub deep: String,
    /// Model identifier for the quick-think tier.
    pub quick: String,
}

/// Where and how to reach the decision engine service.
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_online_tools() -> bool {
    true
}

fn default_stride() -> u32 {
    1
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8015".to_string()
}

fn default_timeout_secs() -> u64 {
    600
}

impl RunConfig {
    /// Load and validate a run configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: RunConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the rest of the harness relies on.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.run_id.is_empty() || self.run_id.contains(['/', '\\']) {
            return Err(GridError::InvalidRunId(self.run_id.clone()));
        }
        if self.tickers.is_empty() {
            return Err(GridError::Config("tickers list is empty".to_string()));
        }
        if self.dates.stride_days == 0 {
            return Err(GridError::InvalidStride(self.dates.stride_days));
        }
        for value in [&self.dates.start, &self.dates.end] {
            NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|source| {
                GridError::InvalidDate {
                    value: value.clone(),
                    source,
                }
            })?;
        }
        Ok(())
    }
}
