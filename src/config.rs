use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::time::Duration;

use crate::campaign::StartGate;
use crate::errors::{AppError, AppResult};
use crate::uploader::pinata_client::DEFAULT_PINATA_ENDPOINT;

pub const API_KEY_VAR: &str = "PINATA_API_KEY";
pub const SECRET_API_KEY_VAR: &str = "PINATA_SECRET_API_KEY";

const APP_DIR_NAME: &str = "Campaign Uploader";

/// 1 TiB; anything larger is a typo
pub const MAX_IMAGE_SIZE_MB_LIMIT: u64 = 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub pinata_endpoint: String,
    /// Per-request timeout; `None` waits as long as the gateway takes
    pub request_timeout_secs: Option<u64>,
    pub start_gate: StartGate,
    pub output_dir: Option<PathBuf>,
    pub max_image_size_mb: u64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pinata_endpoint: DEFAULT_PINATA_ENDPOINT.to_string(),
            request_timeout_secs: None,
            start_gate: StartGate::Always,
            output_dir: None,
            max_image_size_mb: 100,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn manifests_directory(&self) -> AppResult<PathBuf> {
        match &self.output_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(get_data_directory()?.join("campaigns")),
        }
    }

    pub fn log_filter(&self) -> log::LevelFilter {
        self.log_level
            .parse()
            .unwrap_or(log::LevelFilter::Info)
    }
}

/// Pinata credentials. Kept out of the config file; they come from the
/// environment (or a `.env` file) only.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PinataCredentials {
    pub api_key: String,
    pub secret_api_key: String,
}

impl PinataCredentials {
    pub fn new(api_key: impl Into<String>, secret_api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_api_key: secret_api_key.into(),
        }
    }

    /// Missing keys are not an error here: requests go out with empty headers
    /// and Pinata rejects them.
    pub fn from_env() -> Self {
        if dotenvy::dotenv().is_ok() {
            log::debug!("Loaded .env file");
        }

        let credentials = Self::new(read_env(API_KEY_VAR), read_env(SECRET_API_KEY_VAR));
        if !credentials.is_complete() {
            log::warn!(
                "{} or {} is not set; Pinata will reject uploads as unauthenticated",
                API_KEY_VAR,
                SECRET_API_KEY_VAR
            );
        }
        credentials
    }

    pub fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.secret_api_key.is_empty()
    }
}

impl fmt::Debug for PinataCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinataCredentials")
            .field("api_key", &redact(&self.api_key))
            .field("secret_api_key", &redact(&self.secret_api_key))
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

fn read_env(name: &str) -> String {
    std::env::var(name).unwrap_or_default()
}

fn get_config_path() -> AppResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| AppError::Config("Could not find config directory".to_string()))?
        .join(APP_DIR_NAME);

    fs::create_dir_all(&config_dir)?;
    Ok(config_dir.join("config.json"))
}

pub fn get_data_directory() -> AppResult<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| AppError::Config("Could not find data directory".to_string()))?
        .join(APP_DIR_NAME);

    fs::create_dir_all(&data_dir)?;
    Ok(data_dir)
}

pub fn load_config() -> AppResult<Config> {
    load_config_from(&get_config_path()?)
}

pub fn load_config_from(config_path: &Path) -> AppResult<Config> {
    if config_path.exists() {
        let config_str = fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_str).unwrap_or_else(|e| {
            log::warn!("Failed to parse config file: {}. Using defaults.", e);
            Config::default()
        });

        validate_config(&config)?;
        Ok(config)
    } else {
        let default_config = Config::default();
        save_config_to(&default_config, config_path)?;
        Ok(default_config)
    }
}

pub fn save_config_to(config: &Config, config_path: &Path) -> AppResult<()> {
    validate_config(config)?;

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Keep the previous file around in case the new one is wrong
    if config_path.exists() {
        let backup_path = config_path.with_extension("json.bak");
        if let Err(e) = fs::copy(config_path, &backup_path) {
            log::warn!("Failed to create config backup: {}", e);
        }
    }

    let config_str = serde_json::to_string_pretty(config)?;
    fs::write(config_path, config_str)?;

    log::info!("Configuration saved to {}", config_path.display());
    Ok(())
}

pub fn validate_config(config: &Config) -> AppResult<()> {
    let endpoint = config.pinata_endpoint.trim();
    if endpoint.is_empty() {
        return Err(AppError::validation("pinata_endpoint", "Cannot be empty"));
    }

    if !endpoint.starts_with("https://") && !endpoint.starts_with("http://") {
        return Err(AppError::validation(
            "pinata_endpoint",
            "Must be an http:// or https:// URL",
        ));
    }

    if config.request_timeout_secs == Some(0) {
        return Err(AppError::validation(
            "request_timeout_secs",
            "Must be greater than 0 when set",
        ));
    }

    if config.max_image_size_mb == 0 || config.max_image_size_mb > MAX_IMAGE_SIZE_MB_LIMIT {
        return Err(AppError::validation(
            "max_image_size_mb",
            "Must be between 1 and 1048576",
        ));
    }

    let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
    if !valid_log_levels.contains(&config.log_level.as_str()) {
        return Err(AppError::validation("log_level", "Must be a valid log level"));
    }

    Ok(())
}

pub fn reset_config() -> AppResult<()> {
    let config_path = get_config_path()?;

    if config_path.exists() {
        let backup_path = config_path.with_extension("json.reset_backup");
        fs::copy(&config_path, &backup_path)?;
        log::info!("Existing config backed up to {}", backup_path.display());
    }

    save_config_to(&Config::default(), &config_path)?;
    log::info!("Configuration reset to defaults");
    Ok(())
}
