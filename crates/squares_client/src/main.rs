//! Squares - command-line entry point.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command, GameArgs};
use squares_client::ClientConfig;
use tracing::{debug, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match &cli.command {
        Command::Play(args) => {
            let config = resolve_config(&cli, args)?;
            squares_client::tui::run_tui(config).await
        }
        Command::Prompt(args) => {
            // The prompt owns stdout, so logs go to stderr
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
                )
                .with_writer(std::io::stderr)
                .init();
            let config = resolve_config(&cli, args)?;
            squares_client::repl::run_repl(config).await
        }
    }
}

/// Layers command-line overrides on top of the file and environment config.
#[instrument(skip_all, fields(config_path = %cli.config.display()))]
fn resolve_config(cli: &Cli, args: &GameArgs) -> Result<ClientConfig> {
    let mut config = ClientConfig::load(Some(cli.config.as_path()))?;

    if let Some(url) = &cli.server_url {
        config = config.with_server_url(url.clone());
    }
    if let Some(ms) = cli.timeout_ms {
        config = config.with_request_timeout_ms(ms);
    }
    if let Some(size) = args.size {
        config = config.with_board_size(size);
    }
    if let Some(color) = args.color {
        config = config.with_human_color(color.into());
    }
    if let Some(first) = args.first_mover() {
        config = config.with_first_mover(first);
    }

    config.validate()?;
    debug!(?config, "Resolved configuration");
    Ok(config)
}
