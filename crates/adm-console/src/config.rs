use std::time::Duration;

use serde::Deserialize;

use crate::error::ConsoleError;

/// Deployment flavour, selects the log format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Console settings, read from `ADMIN_`-prefixed environment variables
#[derive(Clone, Debug, Deserialize)]
pub struct ConsoleConfig {
    /// Base URL of the mock record store
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub env: Environment,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Remaining stock at or below which a product counts as low on stock
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
    /// Sent to the store as `X-timezone-region`
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_api_base() -> String {
    "http://localhost:3001".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_low_stock_threshold() -> i64 {
    5
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl ConsoleConfig {
    pub fn from_env() -> Result<Self, ConsoleError> {
        Ok(envy::prefixed("ADMIN_").from_env()?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            env: Environment::default(),
            request_timeout_secs: default_request_timeout_secs(),
            low_stock_threshold: default_low_stock_threshold(),
            timezone: default_timezone(),
        }
    }
}
