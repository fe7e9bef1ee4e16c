use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::Command;
use config::CliConfig;

#[derive(Parser, Debug)]
#[command(name = "proscout")]
#[command(about = "Search professional profiles and request introductions", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "proscout.toml")]
    config: PathBuf,

    /// Base URL of the search service
    #[arg(long, env = "PROSCOUT_BASE_URL")]
    base_url: Option<String>,

    /// API key sent as a bearer token
    #[arg(long, env = "PROSCOUT_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "proscout=info,proscout_sdk=info,proscout_core=info".into());

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);

    let config = CliConfig::load(&args.config)?.with_overrides(args.base_url, args.api_key);
    tracing::debug!("Using search service at {}", config.base_url);

    let client = config.build_client()?;
    let output = args.command.run(&client).await?;

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
