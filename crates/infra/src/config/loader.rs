//! Configuration loader
//!
//! Environment variables win; a config file is the fallback. Only
//! `FIELDTRACE_API_BASE_URL` is required — timeout, endpoint paths and
//! device metadata (`FIELDTRACE_API_TIMEOUT_MS`, `FIELDTRACE_LOGIN_PATH`,
//! `FIELDTRACE_SAVE_LOCATION_PATH`, `FIELDTRACE_DEVICE_*`) all have
//! defaults.
//!
//! File fallback probes `config.{json,toml}` and `fieldtrace.{json,toml}`
//! in the working directory, up to two parent directories, and next to the
//! executable; the format is picked by extension.

use std::path::{Path, PathBuf};

use fieldtrace_domain::constants::DEFAULT_TIMEOUT_MS;
use fieldtrace_domain::{ApiConfig, Config, DeviceProfile, EndpointTable, FieldtraceError, Result};

/// Load configuration with automatic fallback strategy.
///
/// # Errors
/// Returns `FieldtraceError::Config` if configuration cannot be loaded from
/// either source.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment");
            Ok(config)
        }
        Err(err) => {
            tracing::debug!(error = ?err, "environment incomplete, probing config files");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables.
///
/// Only the base URL is required; everything else has defaults.
///
/// # Errors
/// Returns `FieldtraceError::Config` if `FIELDTRACE_API_BASE_URL` is missing
/// or a numeric variable does not parse.
pub fn load_from_env() -> Result<Config> {
    let base_url = env_var("FIELDTRACE_API_BASE_URL")?;

    let timeout_ms = match std::env::var("FIELDTRACE_API_TIMEOUT_MS") {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|e| FieldtraceError::Config(format!("Invalid timeout: {}", e)))?,
        Err(_) => DEFAULT_TIMEOUT_MS,
    };

    let mut endpoints = EndpointTable::default();
    if let Ok(path) = std::env::var("FIELDTRACE_LOGIN_PATH") {
        endpoints.login = path;
    }
    if let Ok(path) = std::env::var("FIELDTRACE_SAVE_LOCATION_PATH") {
        endpoints.save_location = path;
    }

    let mut device = DeviceProfile::default();
    if let Ok(brand) = std::env::var("FIELDTRACE_DEVICE_BRAND") {
        device.brand = brand;
    }
    if let Ok(model) = std::env::var("FIELDTRACE_DEVICE_MODEL") {
        device.model = model;
    }
    if let Ok(os_version) = std::env::var("FIELDTRACE_DEVICE_OS_VERSION") {
        device.os_version = os_version;
    }

    Ok(Config { api: ApiConfig { base_url, timeout_ms, endpoints }, device })
}

/// Load configuration from a file.
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `FieldtraceError::Config` if no file is found, the format is
/// invalid, or required fields are missing.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(explicit) if explicit.exists() => explicit,
        Some(explicit) => {
            return Err(FieldtraceError::Config(format!(
                "Config file not found: {}",
                explicit.display()
            )));
        }
        None => probe_config_paths().ok_or_else(|| {
            FieldtraceError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|err| FieldtraceError::Config(format!("Failed to read config file: {}", err)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration content, format detected by extension.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|err| FieldtraceError::Config(format!("Invalid TOML format: {}", err))),
        "json" => serde_json::from_str(contents)
            .map_err(|err| FieldtraceError::Config(format!("Invalid JSON format: {}", err))),
        other => Err(FieldtraceError::Config(format!("Unsupported config format: {}", other))),
    }
}

/// First config file found in the standard locations, if any.
pub fn probe_config_paths() -> Option<PathBuf> {
    let names = ["config.json", "config.toml", "fieldtrace.json", "fieldtrace.toml"];
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        for base in ["", "..", "../.."] {
            candidates.extend(names.iter().map(|name| cwd.join(base).join(name)));
        }
    }

    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.extend(names.iter().map(|name| exe_dir.join(name)));
    }

    candidates.into_iter().find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        FieldtraceError::Config(format!("Missing required environment variable: {}", key))
    })
}
