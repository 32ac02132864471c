use clap::{Parser, Subcommand, ValueEnum};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Compact,
}

/// Device setting a one-shot command changes
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CommandTarget {
    /// Focus duration in minutes (set_duracao)
    Duration,
    /// Short break length in minutes (set_pausa)
    Break,
}

/// monitor and control a study-timer device through its digital twin
#[derive(Parser)]
#[command(name = "trilhar", version)]
pub struct Cli {
    /// Broker host
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Broker port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Full broker base URL (overrides host and port)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Path to configuration file (supports `~`)
    #[arg(short, long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Live dashboard: status refreshed in place, keys send presets
    Watch {
        /// Refresh interval in seconds (default: 1)
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Read the device status once
    Status {
        /// Output format: table (default), json, or compact
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Send a single command to the device
    Send {
        #[arg(value_enum)]
        target: CommandTarget,
        /// Minutes
        #[arg(value_name = "MINUTES")]
        minutes: u32,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,
}
