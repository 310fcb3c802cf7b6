//! Startup configuration
//!
//! Resolution order, later wins:
//! 1. built-in defaults
//! 2. YAML file named by `NV_CONFIG`
//! 3. environment variables (`NV_ADDR`, `NV_ENGINE_MODE`, `ENGINE_API_BASE_URL`,
//!    `ENGINE_API_KEY`, `ENGINE_TIMEOUT_MS`, `NV_CONTRACTS_LOCK`)

use nv_core::EngineMode;
use nv_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_ADDR: &str = "0.0.0.0:8787";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("CONFIG/cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CONFIG/invalid yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CONFIG/{var}: {reason}")]
    InvalidVar { var: &'static str, reason: String },

    #[error("CONFIG/ENGINE_API_BASE_URL is required when the engine mode is real")]
    MissingBaseUrl,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Listen address
    pub addr: String,
    pub engine: EngineConfig,
    /// Path of `contracts.lock.json`, served on `/api/contracts` when set
    pub contracts_lock: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            engine: EngineConfig::default(),
            contracts_lock: None,
        }
    }
}

impl Settings {
    /// Load from `NV_CONFIG` (when set) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var("NV_CONFIG") {
            Ok(path) if !path.is_empty() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        base.with_overrides(|var| std::env::var(var).ok())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Apply variable overrides from `lookup` and validate the result.
    /// Empty values count as unset.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(addr) = get("NV_ADDR") {
            self.addr = addr;
        }
        if let Some(mode) = get("NV_ENGINE_MODE") {
            self.engine.mode = mode
                .parse::<EngineMode>()
                .map_err(|reason| ConfigError::InvalidVar {
                    var: "NV_ENGINE_MODE",
                    reason,
                })?;
        }
        if let Some(url) = get("ENGINE_API_BASE_URL") {
            self.engine.base_url = Some(url);
        }
        if let Some(key) = get("ENGINE_API_KEY") {
            self.engine.api_key = Some(key);
        }
        if let Some(timeout) = get("ENGINE_TIMEOUT_MS") {
            self.engine.timeout_ms = parse_timeout(&timeout)?;
        }
        if let Some(lock) = get("NV_CONTRACTS_LOCK") {
            self.contracts_lock = Some(PathBuf::from(lock));
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.timeout_ms == 0 {
            return Err(ConfigError::InvalidVar {
                var: "ENGINE_TIMEOUT_MS",
                reason: "must be greater than zero".to_string(),
            });
        }
        let has_base_url = self
            .engine
            .base_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty());
        if self.engine.mode == EngineMode::Real && !has_base_url {
            return Err(ConfigError::MissingBaseUrl);
        }
        Ok(())
    }
}

fn parse_timeout(raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|e: std::num::ParseIntError| ConfigError::InvalidVar {
            var: "ENGINE_TIMEOUT_MS",
            reason: e.to_string(),
        })
}
