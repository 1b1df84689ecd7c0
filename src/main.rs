//! Mender CLI entry point.

use std::path::Path;

use clap::Parser;

use mender::cli::commands::{analyze, init, taxonomy};
use mender::cli::{handle_error, load_config, Cli, Commands};
use mender::domain::models::Config;
use mender::infrastructure::logging::LoggerImpl;

fn setup(config_path: Option<&Path>) -> anyhow::Result<(Config, LoggerImpl)> {
    let config = load_config(config_path)?;
    let logger = LoggerImpl::init(&config.logging)?;
    Ok((config, logger))
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let json_mode = cli.json;
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Init(args) => init::execute(args, json_mode).await,
        Commands::Analyze(args) => {
            let (config, _logger) = setup(config_path)?;
            analyze::execute(args, config, json_mode).await
        }
        Commands::Taxonomy(args) => {
            let (config, _logger) = setup(config_path)?;
            taxonomy::execute(args, &config, json_mode)
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;

    // Exit only after `run` returns so the log writer guard is flushed.
    let code = match run(cli).await {
        Ok(code) => code,
        Err(err) => handle_error(&err, json_mode),
    };
    std::process::exit(code);
}
