//! Application settings
//!
//! Defaults, optionally overridden by `config/drowsyguard.toml` and
//! `DROWSY_`-prefixed environment variables.

use config::{Config, ConfigError, Environment, File};
use drowsiness::ScorerConfig;
use serde::Deserialize;
use sessions::{AlarmPolicy, NapPolicy};

/// Top-level application settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Listen address for the REST server
    pub bind_addr: String,
    pub scorer: ScorerConfig,
    pub alarm: AlarmPolicy,
    pub nap: NapPolicy,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            scorer: ScorerConfig::default(),
            alarm: AlarmPolicy::default(),
            nap: NapPolicy::default(),
        }
    }
}

impl AppSettings {
    /// Load settings from file and environment over the defaults
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/drowsyguard").required(false))
            .add_source(Environment::with_prefix("DROWSY").separator("__"))
            .build()?
            .try_deserialize()
    }
}
