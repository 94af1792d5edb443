//! Host-supplied configuration for the core.
//!
//! # Responsibility
//! - Collect tunables that hosts pass in at process start.
//! - Fill every missing field with a working default.
//!
//! # Invariants
//! - An empty JSON object yields `CoreConfig::default()`.
//! - `storage_namespace` is never blank once normalized.

use crate::logging::{default_log_level, LoggingConfig};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_NAMESPACE: &str = "macrum";

/// Core configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct CoreConfig {
    /// Prefix of every persisted key (`{ns}_users`, `{ns}_data_{user}`...).
    pub storage_namespace: String,
    /// Artificial delay applied to signup/login.
    pub simulated_auth_latency_ms: u64,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute log directory. `None` leaves logging to the host.
    pub log_dir: Option<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            storage_namespace: DEFAULT_NAMESPACE.to_string(),
            simulated_auth_latency_ms: 0,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Parses configuration JSON, defaulting absent fields.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(raw)?;
        Ok(config.normalized())
    }

    /// Returns a copy with blank values replaced by defaults.
    pub fn normalized(mut self) -> Self {
        let trimmed = self.storage_namespace.trim();
        self.storage_namespace = if trimmed.is_empty() {
            DEFAULT_NAMESPACE.to_string()
        } else {
            trimmed.to_string()
        };
        if self.log_level.trim().is_empty() {
            self.log_level = default_log_level().to_string();
        }
        self
    }

    pub fn simulated_auth_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_auth_latency_ms)
    }

    /// Logging settings, when a log directory is configured.
    pub fn logging(&self) -> Option<LoggingConfig> {
        self.log_dir.as_ref().map(|log_dir| LoggingConfig {
            level: self.log_level.clone(),
            log_dir: log_dir.clone(),
        })
    }
}
