//! HTTP server binary for paper2pitch.
//!
//! Runs the pipeline behind a single `POST /analyze` endpoint. Configuration
//! comes from environment variables (optionally via a `.env` file):
//!
//! - `PAPER2PITCH_ADDR`       bind address (default `0.0.0.0:8000`)
//! - `EDGEQUAKE_MODEL`        LLM model ID
//! - `EDGEQUAKE_LLM_PROVIDER` LLM provider name
//! - `PAPER2PITCH_INDUSTRY`   default industry hint (overridable per request)

use anyhow::{Context, Result};
use paper2pitch::PipelineConfig;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr: SocketAddr = std::env::var("PAPER2PITCH_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
        .parse()
        .context("Invalid PAPER2PITCH_ADDR")?;

    let mut builder = PipelineConfig::builder();
    if let Ok(industry) = std::env::var("PAPER2PITCH_INDUSTRY") {
        builder = builder.industry(industry);
    }
    let mut config = builder.build().context("Invalid configuration")?;
    config.model = std::env::var("EDGEQUAKE_MODEL").ok().filter(|s| !s.is_empty());
    config.provider_name = std::env::var("EDGEQUAKE_LLM_PROVIDER")
        .ok()
        .filter(|s| !s.is_empty());

    paper2pitch::server::serve(addr, config)
        .await
        .context("Server failed")?;

    Ok(())
}
