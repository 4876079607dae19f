//! Framesync - Framer CMS collection sync
//!
//! Main entry point for the command-line host.

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use framesync_infra::config::{load, load_from_file};
use framesync_lib::cli::Cli;
use framesync_lib::utils::init_tracing;
use framesync_lib::{execute_batch, AppContext};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging FIRST so we can see .env loading
    init_tracing(cli.log_format).context("failed to install tracing subscriber")?;

    match dotenvy::dotenv() {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(err) => debug!(error = %err, "no .env file loaded"),
    }

    let config = match &cli.config {
        Some(path) => load_from_file(Some(path.clone())),
        None => load(),
    }
    .context("failed to load configuration")?;
    let ctx = AppContext::new_with_config(config).context("failed to initialize application")?;
    let requests = cli.requests().context("invalid arguments")?;

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_interrupt(cancel.clone()));

    info!(operation = %cli.command.operation(), requests = requests.len(), "framesync starting");
    let entries = execute_batch(&ctx, &requests, cli.continue_on_fail, &cancel).await?;

    let rendered = serde_json::to_string_pretty(&entries)?;
    writeln!(std::io::stdout().lock(), "{rendered}")?;
    Ok(())
}

async fn cancel_on_interrupt(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        warn!("interrupt received, cancelling");
        cancel.cancel();
    }
}
