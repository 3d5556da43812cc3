//! rag-chain - HTTP entry point

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rag_chain::cli::{bind_addr, Args};
use rag_chain::config::{ProcessEnv, SecretSource, Settings};
use rag_chain::service::{self, DefaultPipelineBuilder, ServiceState};

fn init_tracing(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.verbosity().log_filter()));

    let registry = tracing_subscriber::registry().with(filter);
    if args.json_logs {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load .env before logging so RUST_LOG can come from it
    let secrets = ProcessEnv;
    secrets.refresh();

    init_tracing(&args);

    let settings = args.apply(
        Settings::load(args.config.as_deref()).context("Failed to load settings")?,
    );
    settings.validate()?;

    let addr = bind_addr(&settings).map_err(anyhow::Error::msg)?;

    info!(
        "Starting rag-chain v{} (collection '{}')",
        env!("CARGO_PKG_VERSION"),
        settings.collection
    );

    // The pipeline is built on the first request, never here, so missing
    // credentials or an absent collection leave the process up and degraded
    let state = Arc::new(ServiceState::new(DefaultPipelineBuilder::new(
        settings,
        Arc::new(secrets),
    )));

    service::serve(addr, state).await
}
