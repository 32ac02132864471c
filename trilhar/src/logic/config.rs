use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Longest the dashboard may wait for a twin read
pub const MAX_READ_TIMEOUT_MS: u64 = 3000;
/// Longest a command may stay in flight
pub const MAX_COMMAND_TIMEOUT_MS: u64 = 5000;

/// Connection and timing settings for talking to the context broker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// Broker host (default: localhost)
    pub host: String,
    /// Broker port (default: 1026, Orion's port)
    pub port: u16,
    /// Full base URL, takes precedence over host/port when set
    pub base_url: Option<String>,
    /// Seconds between two status polls (default: 1)
    pub poll_interval_secs: u64,
    /// Timeout for reading the twin in milliseconds (default: 3000)
    pub read_timeout_ms: u64,
    /// Timeout for sending a command in milliseconds (default: 5000)
    pub command_timeout_ms: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1026,
            base_url: None,
            poll_interval_secs: 1,
            read_timeout_ms: 3000,
            command_timeout_ms: 5000,
        }
    }
}

impl BrokerConfig {
    /// Load configuration from a TOML file (supports `~`)
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let expanded = shellexpand::tilde(path).into_owned();
        let content = std::fs::read_to_string(&expanded)
            .with_context(|| format!("failed to read config file {}", expanded))?;
        let config: BrokerConfig = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", expanded))?;
        Ok(config)
    }

    /// Default location of the config file, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "trilhar", "trilhar").map(|pd| pd.config_dir().join("config.toml"))
    }

    /// Explicit config path, or the default file when one exists
    pub fn resolve_path(path: Option<&str>) -> Option<String> {
        match path {
            Some(path) => Some(path.to_string()),
            None => Self::default_path()
                .filter(|default| default.exists())
                .map(|default| default.to_string_lossy().into_owned()),
        }
    }

    /// Load from `path` when given, defaults otherwise
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variables, then command line arguments (highest priority)
    pub fn with_args_and_env(
        self,
        host: Option<String>,
        port: Option<u16>,
        base_url: Option<String>,
        poll_interval: Option<u64>,
    ) -> Self {
        self.with_env().with_args(host, port, base_url, poll_interval)
    }

    /// Apply `TRILHAR_*` environment variables
    pub fn with_env(mut self) -> Self {
        if let Ok(val) = std::env::var("TRILHAR_HOST") {
            self.host = val;
        }
        if let Ok(val) = std::env::var("TRILHAR_PORT") {
            if let Ok(parsed) = val.parse() {
                self.port = parsed;
            }
        }
        if let Ok(val) = std::env::var("TRILHAR_BASE_URL") {
            self.base_url = Some(val);
        }
        if let Ok(val) = std::env::var("TRILHAR_POLL_INTERVAL") {
            if let Ok(parsed) = val.parse() {
                self.poll_interval_secs = parsed;
            }
        }
        self
    }

    /// Apply command line arguments that were given
    pub fn with_args(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        base_url: Option<String>,
        poll_interval: Option<u64>,
    ) -> Self {
        if let Some(val) = host {
            self.host = val;
        }
        if let Some(val) = port {
            self.port = val;
        }
        if let Some(val) = base_url {
            self.base_url = Some(val);
        }
        if let Some(val) = poll_interval {
            self.poll_interval_secs = val;
        }
        self
    }

    /// Reject values that would make the client unusable
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(base) = &self.base_url {
            let parsed = url::Url::parse(base).with_context(|| format!("invalid base URL {}", base))?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                anyhow::bail!("base URL must use http or https, got {}", parsed.scheme());
            }
        }
        if self.poll_interval_secs == 0 {
            anyhow::bail!("poll interval must be at least one second");
        }
        if self.read_timeout_ms == 0 || self.command_timeout_ms == 0 {
            anyhow::bail!("timeouts must be greater than zero");
        }
        if self.read_timeout_ms > MAX_READ_TIMEOUT_MS {
            anyhow::bail!(
                "read timeout {} ms exceeds the {} ms limit",
                self.read_timeout_ms,
                MAX_READ_TIMEOUT_MS
            );
        }
        if self.command_timeout_ms > MAX_COMMAND_TIMEOUT_MS {
            anyhow::bail!(
                "command timeout {} ms exceeds the {} ms limit",
                self.command_timeout_ms,
                MAX_COMMAND_TIMEOUT_MS
            );
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}
