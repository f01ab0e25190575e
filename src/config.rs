use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the gateway
    #[serde(default = "default_host")]
    pub host: String,
    /// Gateway port (default: 3000)
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Execution queue policy. Attempt and backoff values are policy knobs,
/// defined here once rather than per-enqueue.
#[derive(Debug, Clone, Deserialize)]
pub struct QueueConfig {
    /// Number of orders executing in parallel
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Total attempts per job, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Base delay for exponential backoff between attempts
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

fn default_concurrency() -> usize {
    10
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    2000
}

impl QueueConfig {
    /// Delay before retry `attempt` (1-based): base × 2^(attempt-1)
    pub fn backoff_duration(&self, attempt: u32) -> std::time::Duration {
        let delay = self
            .backoff_base_ms
            .saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
        std::time::Duration::from_millis(delay)
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

/// Per-order pipeline policy
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionConfig {
    /// Tolerated deviation between quoted and executed price, in basis points
    #[serde(default = "default_slippage_bps")]
    pub slippage_bps: u32,
    /// Simulated transaction-construction latency
    #[serde(default = "default_stage_delay_ms")]
    pub build_delay_ms: u64,
    /// Simulated confirmation latency after broadcast
    #[serde(default = "default_stage_delay_ms")]
    pub submit_delay_ms: u64,
}

fn default_slippage_bps() -> u32 {
    50
}

fn default_stage_delay_ms() -> u64 {
    1000
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            slippage_bps: default_slippage_bps(),
            build_delay_ms: default_stage_delay_ms(),
            submit_delay_ms: default_stage_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OracleConfig {
    /// Simulated per-venue quote latency
    #[serde(default = "default_quote_latency_ms")]
    pub quote_latency_ms: u64,
}

fn default_quote_latency_ms() -> u64 {
    300
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            quote_latency_ms: default_quote_latency_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default log level when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional TOML file, with `SWAPLANE_*`
    /// environment variables layered on top (e.g. `SWAPLANE_SERVER__PORT=8080`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(Environment::with_prefix("SWAPLANE").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Fast configuration for tests: no I/O delays, immediate retries.
    pub fn for_tests() -> Self {
        Self {
            queue: QueueConfig {
                concurrency: 10,
                max_attempts: 3,
                backoff_base_ms: 5,
            },
            execution: ExecutionConfig {
                slippage_bps: 50,
                build_delay_ms: 5,
                submit_delay_ms: 5,
            },
            oracle: OracleConfig { quote_latency_ms: 5 },
            ..Self::default()
        }
    }
}
