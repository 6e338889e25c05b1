//! Configuration file.
//!
//! JSON at `<config dir>/connprobe/config.json`. Every field has a default,
//! and a missing file means all defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use connprobe_fetch::context::{DEFAULT_INSIGHTS_URL, DEFAULT_KEY_VAULT_URL};
use connprobe_fetch::host::http::DEFAULT_TIMEOUT_SECS;
use connprobe_fetch::{Endpoints, ProbeSettings, TrustSource};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Probe settings.
    #[serde(default)]
    pub probe: ProbeConfig,
    /// Service endpoints.
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    /// Driver TLS roots.
    #[serde(default)]
    pub trust: TrustConfig,
}

/// General settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level for connprobe's own targets when not verbose.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Probe settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Timeout for each network operation, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Service endpoint overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Key vault URL template containing `{name}`.
    #[serde(default = "default_key_vault_url")]
    pub key_vault_url: String,
    /// Telemetry query API base URL.
    #[serde(default = "default_insights_url")]
    pub insights_url: String,
}

/// Trust store source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustConfig {
    /// PEM bundle to use instead of the system store.
    #[serde(default)]
    pub ca_bundle: Option<PathBuf>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_key_vault_url() -> String {
    DEFAULT_KEY_VAULT_URL.to_string()
}

fn default_insights_url() -> String {
    DEFAULT_INSIGHTS_URL.to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            key_vault_url: default_key_vault_url(),
            insights_url: default_insights_url(),
        }
    }
}

impl Config {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("connprobe")
            .join("config.json")
    }

    /// Loads configuration from `path`, or the default path.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load_from(&Self::default_path()),
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Probe settings, with `timeout_override` (seconds) taking precedence.
    pub fn probe_settings(&self, timeout_override: Option<u64>) -> ProbeSettings {
        let secs = timeout_override.unwrap_or(self.probe.timeout_secs);
        ProbeSettings::default()
            .with_timeout(Duration::from_secs(secs))
            .with_endpoints(Endpoints {
                key_vault_url: self.endpoints.key_vault_url.clone(),
                insights_url: self.endpoints.insights_url.clone(),
            })
    }

    /// Where driver TLS roots are loaded from.
    pub fn trust_source(&self) -> TrustSource {
        match &self.trust.ca_bundle {
            Some(path) => TrustSource::Bundle(path.clone()),
            None => TrustSource::System,
        }
    }
}
