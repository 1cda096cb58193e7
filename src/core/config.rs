//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Default public endpoint of the machine translation API
pub const DEFAULT_ENDPOINT: &str = "https://tmt.tencentcloudapi.com";

/// Configuration for translator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Provider endpoint URL
    pub endpoint: String,
    /// Provider region, sent as `X-TC-Region`
    pub region: String,
    /// Response language, sent as `X-TC-Language`
    pub language: String,
    /// Pre-computed `Authorization` header value, if the endpoint needs one
    pub authorization: Option<String>,
    /// Project id attached to every request
    pub project_id: i64,
    /// Maximum calls per second
    pub qps: f64,
    /// Exclusive upper bound on input length, in characters
    pub length_limit: usize,
    /// Extra throttle delay absorbing scheduler jitter
    pub throttle_margin_ms: u64,
    /// Per-request HTTP timeout
    pub timeout_ms: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            region: "ap-shanghai".to_string(),
            language: "en-US".to_string(),
            authorization: None,
            project_id: 0,
            qps: 5.0,
            length_limit: 2000,
            throttle_margin_ms: 5,
            timeout_ms: 30000,
        }
    }
}

impl TranslatorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let endpoint = std::env::var("TMT_ENDPOINT").unwrap_or(defaults.endpoint);
        let region = std::env::var("TMT_REGION").unwrap_or(defaults.region);
        let language = std::env::var("TMT_LANGUAGE").unwrap_or(defaults.language);
        let authorization = std::env::var("TMT_AUTHORIZATION")
            .ok()
            .filter(|v| !v.is_empty());

        let project_id = std::env::var("TMT_PROJECT_ID")
            .unwrap_or_else(|_| "0".to_string())
            .parse::<i64>()?;

        let qps = std::env::var("TMT_QPS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<f64>()?;

        let length_limit = std::env::var("TMT_LENGTH_LIMIT")
            .unwrap_or_else(|_| "2000".to_string())
            .parse::<usize>()?;

        let throttle_margin_ms = std::env::var("TMT_THROTTLE_MARGIN_MS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u64>()?;

        let timeout_ms = std::env::var("TMT_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".to_string())
            .parse::<u64>()?;

        Ok(Self {
            endpoint,
            region,
            language,
            authorization,
            project_id,
            qps,
            length_limit,
            throttle_margin_ms,
            timeout_ms,
        })
    }

    /// Load from environment, falling back to a config file when given
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let config = match path {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => Self::from_env()?,
        };

        if config.authorization.is_none() {
            warn!("No authorization configured; endpoint must accept unsigned requests");
        }

        Ok(config)
    }

    /// Load from a JSON or YAML file, chosen by extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = if is_yaml(path) {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };
        Ok(config)
    }

    /// Save configuration to file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let content = if is_yaml(path) {
            serde_yaml::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.endpoint.is_empty() {
            return Err(anyhow::anyhow!("API endpoint is required"));
        }

        if !self.qps.is_finite() || self.qps <= 0.0 {
            return Err(anyhow::anyhow!("qps must be a finite number greater than 0"));
        }

        if self.length_limit == 0 {
            return Err(anyhow::anyhow!("length_limit must be greater than 0"));
        }

        if self.timeout_ms == 0 {
            return Err(anyhow::anyhow!("timeout_ms must be greater than 0"));
        }

        Ok(())
    }

    /// Minimum spacing between calls, `1000 / qps` milliseconds
    pub fn interval(&self) -> Duration {
        Duration::from_millis((1000.0 / self.qps) as u64)
    }

    /// Throttle margin as a `Duration`
    pub fn throttle_margin(&self) -> Duration {
        Duration::from_millis(self.throttle_margin_ms)
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Whether the path has a YAML extension
fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}
