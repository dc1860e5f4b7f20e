use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use nodry_admin::cli::Cli;
use nodry_admin::commands;
use nodry_client::ApiClient;
use nodry_config::ConfigLoader;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so exported CSV on stdout stays clean.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    if let Some(path) = &cli.env_file {
        loader = loader.with_env_file(path);
    }
    if let Some(url) = &cli.api_url {
        loader = loader.with_api_url(url);
    }

    let config = match loader.load().context("failed to load configuration") {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(api = config.base_url(), "configuration loaded");

    let client = match ApiClient::from_config(&config)
        .await
        .context("failed to initialise API client")
    {
        Ok(client) => client,
        Err(err) => {
            eprintln!("Error: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    match commands::dispatch(&client, &config, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            commands::report_failure(&client, &err).await;
            ExitCode::FAILURE
        }
    }
}
