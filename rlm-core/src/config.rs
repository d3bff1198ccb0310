//! Manager Configuration
//!
//! Backend connection and scheduler settings. Supports loading from
//! environment variables with the RLM_ prefix.

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{RetentionError, RetentionResult};

/// Expiry scheduler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerConfig {
    /// Seconds between ticks
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
    /// Look-ahead window for expiry warnings, in days
    #[serde(default = "default_warning_days")]
    pub warning_days: u32,
    /// Destination for auto-archived evidence
    #[serde(default = "default_archive_location")]
    pub archive_location: String,
    /// Whether the manager starts the scheduler
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_interval() -> u64 {
    24 * 60 * 60
}

fn default_warning_days() -> u32 {
    7
}

fn default_archive_location() -> String {
    "auto-archive".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_api_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            warning_days: default_warning_days(),
            archive_location: default_archive_location(),
            enabled: default_enabled(),
        }
    }
}

/// Manager configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerConfig {
    /// Base URL of the evidence-management API
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: default_timeout(),
            scheduler: SchedulerConfig::default(),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl ManagerConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - RLM_API_URL: Backend base URL
    /// - RLM_REQUEST_TIMEOUT_SECS: Per-request timeout
    /// - RLM_SCHEDULER_INTERVAL_SECS: Seconds between scheduler ticks
    /// - RLM_EXPIRY_WARNING_DAYS: Expiry warning window
    /// - RLM_ARCHIVE_LOCATION: Auto-archive destination
    /// - RLM_SCHEDULER_ENABLED: true/false
    ///
    /// Unset or unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parsed = |key: &str| lookup(key).and_then(|s| s.trim().parse().ok());

        Self {
            api_url: lookup("RLM_API_URL").unwrap_or(defaults.api_url),
            request_timeout_secs: parsed("RLM_REQUEST_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout_secs),
            scheduler: SchedulerConfig {
                interval_secs: parsed("RLM_SCHEDULER_INTERVAL_SECS")
                    .unwrap_or(defaults.scheduler.interval_secs),
                warning_days: lookup("RLM_EXPIRY_WARNING_DAYS")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(defaults.scheduler.warning_days),
                archive_location: lookup("RLM_ARCHIVE_LOCATION")
                    .unwrap_or(defaults.scheduler.archive_location),
                enabled: lookup("RLM_SCHEDULER_ENABLED")
                    .and_then(|s| parse_flag(&s))
                    .unwrap_or(defaults.scheduler.enabled),
            },
        }
    }

    /// Check the configuration for values the manager cannot run with
    pub fn validate(&self) -> RetentionResult<()> {
        if self.api_url.trim().is_empty() {
            return Err(RetentionError::config("API URL must not be empty"));
        }
        if self.request_timeout_secs == 0 {
            return Err(RetentionError::config(
                "request timeout must be at least one second",
            ));
        }
        if self.scheduler.interval_secs == 0 {
            return Err(RetentionError::config(
                "scheduler interval must be at least one second",
            ));
        }
        if self.scheduler.archive_location.trim().is_empty() {
            return Err(RetentionError::config("archive location must not be empty"));
        }
        Ok(())
    }
}
