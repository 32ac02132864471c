// trilhar/src/main.rs

mod cli;
mod logic;

use clap::Parser;
use cli::{Cli, Commands, ConfigAction};
use logic::client::{config, report, send};
use logic::config::BrokerConfig;
use tracing_subscriber::EnvFilter;

/// Log to stderr; `RUST_LOG` overrides the per-command default
fn init_tracing(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command‐line arguments
    let args = Cli::parse();
    let command = args.command.unwrap_or(Commands::Watch { interval: None });

    // Log lines would tear the dashboard, so it stays quiet unless asked
    match command {
        Commands::Watch { .. } => init_tracing("off"),
        _ => init_tracing("warn"),
    }

    let interval = match &command {
        Commands::Watch { interval } => *interval,
        _ => None,
    };

    // Defaults < config file < environment < flags
    let config_path = BrokerConfig::resolve_path(args.config.as_deref());
    let broker_config = BrokerConfig::load(config_path.as_deref())?.with_args_and_env(
        args.host,
        args.port,
        args.base_url,
        interval,
    );
    broker_config.validate()?;

    // Dispatch on subcommand
    match command {
        Commands::Watch { .. } => logic::dashboard::run(broker_config).await?,
        Commands::Status { format } => report::run(broker_config, format).await?,
        Commands::Send { target, minutes } => send::run(broker_config, target, minutes).await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => config::show(&broker_config, config_path.as_deref()),
        },
    }

    Ok(())
}
