//! Engine configuration and its on-disk manager.

use std::{
    env,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::payoff::{ProjectionSettings, DEFAULT_HORIZON_MONTHS, PAID_OFF_EPSILON};

pub const HOME_ENV_VAR: &str = "FINFLOW_HOME";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Tunables shared by the payoff engine, net-worth history and hosts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    #[serde(default = "EngineConfig::default_horizon_months")]
    pub horizon_months: u32,
    #[serde(default = "EngineConfig::default_payoff_epsilon")]
    pub payoff_epsilon: f64,
    #[serde(default = "EngineConfig::default_retention_days")]
    pub net_worth_retention_days: u32,
    #[serde(default = "EngineConfig::default_currency")]
    pub currency: String,
    #[serde(default = "EngineConfig::default_locale")]
    pub locale: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            horizon_months: Self::default_horizon_months(),
            payoff_epsilon: Self::default_payoff_epsilon(),
            net_worth_retention_days: Self::default_retention_days(),
            currency: Self::default_currency(),
            locale: Self::default_locale(),
        }
    }
}

impl EngineConfig {
    pub fn default_horizon_months() -> u32 {
        DEFAULT_HORIZON_MONTHS
    }

    pub fn default_payoff_epsilon() -> f64 {
        PAID_OFF_EPSILON
    }

    pub fn default_retention_days() -> u32 {
        365
    }

    pub fn default_currency() -> String {
        "USD".into()
    }

    pub fn default_locale() -> String {
        "en-US".into()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizon_months == 0 {
            return Err(ConfigError::Invalid(
                "horizon_months must be at least 1".into(),
            ));
        }
        if !self.payoff_epsilon.is_finite() || self.payoff_epsilon <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "payoff_epsilon must be positive, got {}",
                self.payoff_epsilon
            )));
        }
        if self.currency.trim().is_empty() {
            return Err(ConfigError::Invalid("currency must not be empty".into()));
        }
        Ok(())
    }

    pub fn projection_settings(&self) -> ProjectionSettings {
        ProjectionSettings {
            horizon_months: self.horizon_months,
            epsilon: self.payoff_epsilon,
        }
    }
}

/// Loads and atomically saves [`EngineConfig`] under a base directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        let config_dir = base.join("config");
        fs::create_dir_all(&config_dir)?;
        Ok(Self::new(config_dir.join(CONFIG_FILE)))
    }

    /// `$FINFLOW_HOME`, falling back to `~/.finflow`.
    pub fn default_base_dir() -> PathBuf {
        if let Some(home) = env::var_os(HOME_ENV_VAR).filter(|value| !value.is_empty()) {
            return PathBuf::from(home);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".finflow")
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Missing files yield defaults; present files must validate.
    pub fn load(&self) -> Result<EngineConfig, ConfigError> {
        if !self.config_path.exists() {
            return Ok(EngineConfig::default());
        }
        let data = fs::read_to_string(&self.config_path)?;
        let config: EngineConfig =
            serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &EngineConfig) -> Result<(), ConfigError> {
        config.validate()?;
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        let tmp = tmp_path(&self.config_path);
        write_all(&tmp, &json)?;
        fs::rename(&tmp, &self.config_path)?;
        Ok(())
    }
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_all(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
