//! Configuration management for the checkpost pipeline.

use std::time::Duration;

use anyhow::{Context, Result};
use checkpost_submit::{ClientConfig, EngineConfig};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "checkpost.toml";

/// Complete pipeline configuration with defaults, file, and environment
/// overrides.
///
/// Configuration is loaded in priority order:
/// 1. Environment variables prefixed `CHECKPOST_` (highest priority)
/// 2. Configuration file (`checkpost.toml`)
/// 3. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Recording service endpoint accepting record submissions.
    ///
    /// Environment variable: `CHECKPOST_SERVICE_URL`
    #[serde(default = "default_service_url")]
    pub service_url: String,

    /// Time bound on each remote submission, in seconds.
    ///
    /// Environment variable: `CHECKPOST_SUBMIT_TIMEOUT_SECONDS`
    #[serde(default = "default_submit_timeout")]
    pub submit_timeout_seconds: u64,

    /// Path of the durable queue file.
    ///
    /// Environment variable: `CHECKPOST_QUEUE_PATH`
    #[serde(default = "default_queue_path")]
    pub queue_path: String,

    /// Width of the duplicate-scan suppression window, in seconds.
    ///
    /// Environment variable: `CHECKPOST_DEBOUNCE_WINDOW_SECONDS`
    #[serde(default = "default_debounce_window")]
    pub debounce_window_seconds: u64,

    /// User agent presented to the recording service.
    ///
    /// Environment variable: `CHECKPOST_USER_AGENT`
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Config {
    /// Load configuration from defaults, config file, and environment
    /// variable overrides.
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed("CHECKPOST_"));

        let config: Self = figment.extract().context("failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Convert to the submission client's configuration.
    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig {
            service_url: self.service_url.clone(),
            user_agent: self.user_agent.clone(),
            max_redirects: 3,
        }
    }

    /// Convert to the engine's configuration.
    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig { submit_timeout: Duration::from_secs(self.submit_timeout_seconds) }
    }

    /// The debounce window as a duration.
    pub fn debounce_window(&self) -> Duration {
        Duration::from_secs(self.debounce_window_seconds)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        url::Url::parse(&self.service_url)
            .with_context(|| format!("invalid service_url {:?}", self.service_url))?;

        if self.submit_timeout_seconds == 0 {
            anyhow::bail!("submit_timeout_seconds must be greater than 0");
        }

        if self.queue_path.is_empty() {
            anyhow::bail!("queue_path must not be empty");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            submit_timeout_seconds: default_submit_timeout(),
            queue_path: default_queue_path(),
            debounce_window_seconds: default_debounce_window(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_service_url() -> String {
    "http://127.0.0.1:8787/checkin".to_string()
}

fn default_submit_timeout() -> u64 {
    10
}

fn default_queue_path() -> String {
    "checkpost_queue.json".to_string()
}

fn default_debounce_window() -> u64 {
    3
}

fn default_user_agent() -> String {
    "Checkpost/0.1".to_string()
}
