//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `plughub.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use plughub_adapter_ble::BleConfig;
use plughub_app::retry::RetryPolicy;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Startup privilege requirements.
    pub privileges: PrivilegesConfig,
    /// Scan and retry behaviour of the plug service.
    pub control: ControlConfig,
    /// BLE radio timeouts.
    pub ble: BleConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Privilege requirements checked before the listener binds.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PrivilegesConfig {
    /// Refuse to start unless running as root.
    pub require_root: bool,
}

/// Plug service tuning.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// How long each discovery scan listens for advertisements, in seconds.
    pub scan_duration_secs: u16,
    /// Total attempts for a scan or connect interrupted by a disconnect.
    pub retry_attempts: u32,
    /// Pause between two attempts, in milliseconds.
    pub retry_delay_ms: u64,
}

impl Config {
    /// Load configuration from `plughub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting values fail validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("plughub.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("PLUGHUB_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("PLUGHUB_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("PLUGHUB_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Ok(val) = std::env::var("PLUGHUB_REQUIRE_ROOT") {
            if let Some(flag) = parse_flag(&val) {
                self.privileges.require_root = flag;
            }
        }
        if let Ok(val) = std::env::var("PLUGHUB_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.control.scan_duration_secs == 0 {
            return Err(ConfigError::Validation(
                "control.scan_duration_secs must be non-zero".to_string(),
            ));
        }
        if self.control.retry_attempts == 0 {
            return Err(ConfigError::Validation(
                "control.retry_attempts must be non-zero".to_string(),
            ));
        }
        if self.ble.connect_timeout_secs == 0 || self.ble.io_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "ble timeouts must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Retry policy applied to scans and connects.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.control.retry_attempts,
            Duration::from_millis(self.control.retry_delay_ms),
        )
    }

    /// Duration of each discovery scan.
    #[must_use]
    pub fn scan_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.control.scan_duration_secs))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "plughubd=info,plughub=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for PrivilegesConfig {
    fn default() -> Self {
        Self { require_root: true }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            scan_duration_secs: 10,
            retry_attempts: RetryPolicy::DEFAULT_MAX_ATTEMPTS,
            retry_delay_ms: 0,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
