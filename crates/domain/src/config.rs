//! Configuration structures
//!
//! Loading lives in `fieldtrace-infra`; these are the pure shapes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LOGIN_PATH, DEFAULT_SAVE_LOCATION_PATH, DEFAULT_TIMEOUT_MS};
use crate::types::DeviceProfile;

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub device: DeviceProfile,
}

/// Remote API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL without a trailing slash, e.g. `https://api.example.com`.
    pub base_url: String,
    /// Wall-clock bound applied to every request.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub endpoints: EndpointTable,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            endpoints: EndpointTable::default(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Symbolic endpoint names resolved against [`EndpointTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    SaveLocation,
}

/// Static table mapping endpoint keys to fixed URL paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointTable {
    #[serde(default = "default_login_path")]
    pub login: String,
    #[serde(default = "default_save_location_path")]
    pub save_location: String,
}

impl EndpointTable {
    /// Resolve a symbolic endpoint key to its path.
    pub fn path(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Login => &self.login,
            Endpoint::SaveLocation => &self.save_location,
        }
    }
}

impl Default for EndpointTable {
    fn default() -> Self {
        Self { login: default_login_path(), save_location: default_save_location_path() }
    }
}

fn default_login_path() -> String {
    DEFAULT_LOGIN_PATH.to_string()
}

fn default_save_location_path() -> String {
    DEFAULT_SAVE_LOCATION_PATH.to_string()
}
