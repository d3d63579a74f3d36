use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::{KpiError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Runtime configuration.
///
/// Loaded from a TOML file when one exists, then overridden field by field
/// from `KPI_*` environment variables.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub db_path: PathBuf,
    pub amf_log: PathBuf,
    pub smf_log: PathBuf,
    pub port: u16,
    pub log_dir: PathBuf,
    pub metrics_addr: Option<SocketAddr>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("db/5g_kpis.db"),
            amf_log: PathBuf::from("logs/amf.log"),
            smf_log: PathBuf::from("logs/smf.log"),
            port: 8000,
            log_dir: PathBuf::from("logs"),
            metrics_addr: None,
        }
    }
}

impl Config {
    /// Load `path` (or `config.toml`) if present, falling back to defaults,
    /// and apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        let mut config = if config_path.exists() {
            let content = fs::read_to_string(config_path).map_err(|e| {
                KpiError::Config(format!(
                    "Failed to read config file '{}': {}",
                    config_path.display(),
                    e
                ))
            })?;
            Self::from_toml(&content)?
        } else if path.is_some() {
            return Err(KpiError::Config(format!(
                "Config file '{}' does not exist",
                config_path.display()
            )));
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("KPI_DB_PATH") {
            self.db_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("KPI_AMF_LOG") {
            self.amf_log = PathBuf::from(v);
        }
        if let Some(v) = lookup("KPI_SMF_LOG") {
            self.smf_log = PathBuf::from(v);
        }
        if let Some(v) = lookup("KPI_LOG_DIR") {
            self.log_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("KPI_PORT") {
            self.port = v
                .trim()
                .parse()
                .map_err(|e| KpiError::Config(format!("Invalid KPI_PORT '{}': {}", v, e)))?;
        }
        if let Some(v) = lookup("KPI_METRICS_ADDR") {
            if v.trim().is_empty() {
                self.metrics_addr = None;
            } else {
                let addr = v.trim().parse().map_err(|e| {
                    KpiError::Config(format!("Invalid KPI_METRICS_ADDR '{}': {}", v, e))
                })?;
                self.metrics_addr = Some(addr);
            }
        }
        Ok(())
    }
}
