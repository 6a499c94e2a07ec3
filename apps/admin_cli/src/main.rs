use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{EstudianteController, HttpApiClient};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod console;

use commands::{confirmer_for, run, Command};
use config::{load_settings, normalize_base_url, DEFAULT_CONFIG_FILE};
use console::ConsoleNotifier;

#[derive(Parser, Debug)]
#[command(about = "Administra estudiantes y personas contra el API del backend")]
struct Cli {
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Overrides the configured api base url.
    #[arg(long)]
    api_url: Option<String>,
    /// Print records as JSON instead of a table.
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(&cli.config);
    if let Some(api_url) = &cli.api_url {
        settings.api_base_url = api_url.clone();
    }
    let base_url = normalize_base_url(&settings.api_base_url)?;
    tracing::info!(api = %base_url, "using backend");

    let api = Arc::new(
        HttpApiClient::with_timeout(base_url, settings.request_timeout())
            .context("failed to build http client")?,
    );
    let notifier = Arc::new(ConsoleNotifier::default());
    let mut controller = EstudianteController::new(
        api.clone(),
        api.clone(),
        notifier.clone(),
        confirmer_for(&cli.command),
    );

    run(cli.command, &mut controller, api.as_ref(), &notifier, cli.json).await
}
