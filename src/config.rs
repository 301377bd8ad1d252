use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::common::constants::*;
use crate::common::error::{GeocoderError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub geocoder: GeocoderConfig,
    pub policy: GeocodePolicy,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub endpoint: String,
    pub user_agent: String,
    pub delay_ms: u64,
    pub timeout_seconds: u64,
    pub result_limit: u32,
}

impl GeocoderConfig {
    /// Per-request HTTP timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: NOMINATIM_SEARCH_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            delay_ms: DEFAULT_DELAY_MS,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            result_limit: DEFAULT_RESULT_LIMIT,
        }
    }
}

/// Read-only lookup rules shared by the location builder and the candidate
/// selector. Built once at startup and passed by reference.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeocodePolicy {
    /// Accepted values of a candidate's `class`
    pub classes: Vec<String>,
    /// Accepted values of a candidate's `type`
    pub types: Vec<String>,
    /// How many leading candidates of a response are inspected
    pub candidate_limit: usize,
    /// Cell text meaning "no value"
    pub missing_value: String,
}

impl Default for GeocodePolicy {
    fn default() -> Self {
        Self {
            classes: LOOKUP_CLASSES.iter().map(|s| s.to_string()).collect(),
            types: LOOKUP_TYPES.iter().map(|s| s.to_string()).collect(),
            candidate_limit: LOOKUP_LIMIT,
            missing_value: MISSING_VALUE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: String,
    pub file_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: DEFAULT_LOG_DIR.to_string(),
            file_name: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Prometheus listener address; the exporter stays off when unset
    pub listen_addr: Option<String>,
}

impl Config {
    /// Load settings: defaults, then the TOML file, then environment overrides.
    ///
    /// An explicit `path` must exist. Without one, `geo_enricher.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeocoderError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Apply `GEO_ENRICHER_*` overrides. `lookup` resolves a variable name.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self.geocoder.endpoint = endpoint;
        }
        if let Some(agent) = lookup(ENV_USER_AGENT) {
            self.geocoder.user_agent = agent;
        }
        if let Some(delay) = lookup(ENV_DELAY_MS) {
            self.geocoder.delay_ms = parse_number(ENV_DELAY_MS, &delay)?;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_SECONDS) {
            self.geocoder.timeout_seconds = parse_number(ENV_TIMEOUT_SECONDS, &timeout)?;
        }
        if let Some(addr) = lookup(ENV_METRICS_ADDR) {
            self.metrics.listen_addr = Some(addr);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.geocoder.endpoint.trim().is_empty() {
            return Err(GeocoderError::Config("geocoder.endpoint is empty".into()));
        }
        if self.geocoder.result_limit == 0 {
            return Err(GeocoderError::Config(
                "geocoder.result_limit must be positive".into(),
            ));
        }
        if self.policy.classes.is_empty() || self.policy.types.is_empty() {
            return Err(GeocoderError::Config(
                "policy.classes and policy.types must not be empty".into(),
            ));
        }
        if self.policy.candidate_limit == 0 {
            return Err(GeocoderError::Config(
                "policy.candidate_limit must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.geocoder.delay_ms)
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value.trim().parse().map_err(|e| {
        GeocoderError::Config(format!("{key} must be a non-negative integer, got '{value}': {e}"))
    })
}
