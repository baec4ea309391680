//! TRADEGRID — Batch experiment grid driver for trading-agent decision engines
//!
//! Entry point. Parses the command line, loads and validates the run
//! configuration, initialises structured logging, constructs the engine
//! client, and drives the full grid exactly once.

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;

use tradegrid::config::RunConfig;
use tradegrid::engine::graph::GraphClient;
use tradegrid::recorder::EpisodeRecorder;
use tradegrid::runner::GridRunner;

const BANNER: &str = r#"
 _____  ____      _     ____   _____   ____  ____   ___  ____
|_   _||  _ \    / \   |  _ \ | ____| / ___||  _ \ |_ _||  _ \
  | |  | |_) |  / _ \  | | | ||  _|  | |  _ | |_) | | | | | | |
  | |  |  _ <  / ___ \ | |_| || |___ | |_| ||  _ <  | | | |_| |
  |_|  |_| \_\/_/   \_\|____/ |_____| \____||_| \_\|___||____/

  Batch Experiment Grid Driver for Trading-Agent Engines
  v0.1.0
"#;

/// Results root used when `TRADEGRID_RESULTS_DIR` is unset.
const DEFAULT_RESULTS_DIR: &str = "experiments/results";

#[derive(Debug, Parser)]
#[command(
    name = "tradegrid",
    about = "Batch experiment grid driver for trading-agent decision engines"
)]
struct Args {
    /// Path to the run configuration TOML file.
    #[arg(long)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let args = Args::parse();

    // Load configuration from TOML
    let cfg = RunConfig::load(&args.config)?;

    // Initialise structured logging
    init_logging();

    // Print startup banner
    println!("{BANNER}");
    info!(
        run_id = %cfg.run_id,
        tickers = cfg.tickers.len(),
        analysts = cfg.analysts.len(),
        provider = %cfg.llm.provider,
        deep = %cfg.llm.deep,
        quick = %cfg.llm.quick,
        "TRADEGRID starting up"
    );

    // Results root is resolved from the environment once, here at the
    // boundary; the core only ever sees an explicit path.
    let results_root = std::env::var("TRADEGRID_RESULTS_DIR")
        .unwrap_or_else(|_| DEFAULT_RESULTS_DIR.to_string());
    let recorder = EpisodeRecorder::create(Path::new(&results_root), &cfg.run_id)?;

    // One engine instance for the entire run; construction failure is fatal.
    let engine = GraphClient::new(&cfg.engine, &cfg.llm, &cfg.analysts, cfg.online_tools)?;

    let runner = GridRunner::new(cfg, Box::new(engine), recorder);
    let report = runner.run().await?;

    info!(%report, "TRADEGRID shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tradegrid=info"));

    let json_logging = std::env::var("TRADEGRID_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
