use crate::constants::{
    DEFAULT_DATASET_PATH, DEFAULT_EVAL_ROWS, DEFAULT_HOST, DEFAULT_MODEL_PATH, DEFAULT_PORT,
};
use crate::error::{PredictorError, Result};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub dataset: DatasetConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_MODEL_PATH),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: PathBuf,
    /// Number of leading rows used as the evaluation slice
    pub eval_rows: usize,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATASET_PATH),
            eval_rows: DEFAULT_EVAL_ROWS,
        }
    }
}

/// Prometheus exporter; disabled unless an address is set
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub addr: Option<String>,
}

/// Command-line values; `None` leaves the lower layers untouched
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub model_path: Option<PathBuf>,
    pub dataset_path: Option<PathBuf>,
    pub eval_rows: Option<usize>,
    pub metrics_addr: Option<String>,
}

impl Config {
    /// Resolve defaults, then the TOML file, then `PULSE_*` variables from
    /// `lookup`, then command-line overrides, and validate the result.
    pub fn layered<F>(path: impl AsRef<Path>, lookup: F, overrides: &ConfigOverrides) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::load(path)?;
        config.apply_env_from(lookup)?;
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("Config file '{}' not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| {
            PredictorError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply `PULSE_*` overrides resolved through `lookup`
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("PULSE_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PULSE_PORT") {
            self.server.port = port.trim().parse().map_err(|_| {
                PredictorError::Config(format!("PULSE_PORT is not a valid port: '{}'", port))
            })?;
        }
        if let Some(path) = lookup("PULSE_MODEL_PATH") {
            self.model.path = PathBuf::from(path);
        }
        if let Some(path) = lookup("PULSE_DATASET_PATH") {
            self.dataset.path = PathBuf::from(path);
        }
        if let Some(rows) = lookup("PULSE_EVAL_ROWS") {
            self.dataset.eval_rows = rows.trim().parse().map_err(|_| {
                PredictorError::Config(format!("PULSE_EVAL_ROWS is not a row count: '{}'", rows))
            })?;
        }
        if let Some(addr) = lookup("PULSE_METRICS_ADDR") {
            self.metrics.addr = Some(addr).filter(|a| !a.trim().is_empty());
        }
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(host) = &overrides.host {
            self.server.host = host.clone();
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(path) = &overrides.model_path {
            self.model.path = path.clone();
        }
        if let Some(path) = &overrides.dataset_path {
            self.dataset.path = path.clone();
        }
        if let Some(rows) = overrides.eval_rows {
            self.dataset.eval_rows = rows;
        }
        if let Some(addr) = &overrides.metrics_addr {
            self.metrics.addr = Some(addr.clone());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(PredictorError::Config("server.port must be non-zero".into()));
        }
        if self.dataset.eval_rows == 0 {
            return Err(PredictorError::Config(
                "dataset.eval_rows must be at least 1".into(),
            ));
        }
        self.bind_addr()?;
        if let Some(addr) = &self.metrics.addr {
            addr.parse::<SocketAddr>().map_err(|_| {
                PredictorError::Config(format!("metrics.addr is not a socket address: '{}'", addr))
            })?;
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|_| {
                PredictorError::Config(format!(
                    "invalid bind address '{}:{}'",
                    self.server.host, self.server.port
                ))
            })
    }
}
