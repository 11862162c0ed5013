//! # Configuration Management
//!
//! Centralized configuration for applications built on the socket roles.
//!
//! This module provides structured configuration for servers and clients
//! (addresses, listen backlog, socket options, receive buffer sizing) and for
//! logging.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment-specific overrides via `from_env()`

use crate::core::Address;
use crate::error::{constants, Result, SocketError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::net::SocketAddrV4;
use std::path::Path;
use tracing::Level;

/// Default pending-connection queue length for listening sockets
pub const DEFAULT_BACKLOG: i32 = 128;

/// Default receive buffer size for client reads
pub const DEFAULT_RECV_BUFFER_SIZE: usize = 4096;

/// Largest payload a single IPv4 UDP datagram can carry
pub const MAX_DATAGRAM_SIZE: usize = 65_507;

/// Main configuration structure that contains all configurable settings
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SocketConfig {
    /// Server-specific configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Client-specific configuration
    #[serde(default)]
    pub client: ClientConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SocketConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path).map_err(|e| {
            SocketError::ConfigError(format!("{}: {e}", constants::ERR_CONFIG_OPEN))
        })?;

        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(|e| {
            SocketError::ConfigError(format!("{}: {e}", constants::ERR_CONFIG_READ))
        })?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content).map_err(|e| {
            SocketError::ConfigError(format!("{}: {e}", constants::ERR_CONFIG_PARSE))
        })
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Start with defaults
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("SOCKET_CORE_SERVER_ADDRESS") {
            config.server.address = addr;
        }

        if let Ok(backlog) = std::env::var("SOCKET_CORE_SERVER_BACKLOG") {
            if let Ok(val) = backlog.parse::<i32>() {
                config.server.backlog = val;
            }
        }

        if let Ok(addr) = std::env::var("SOCKET_CORE_CLIENT_ADDRESS") {
            config.client.address = addr;
        }

        if let Ok(size) = std::env::var("SOCKET_CORE_RECV_BUFFER_SIZE") {
            if let Ok(val) = size.parse::<usize>() {
                config.client.recv_buffer_size = val;
            }
        }

        if let Ok(level) = std::env::var("SOCKET_CORE_LOG_LEVEL") {
            if let Ok(val) = level.parse::<Level>() {
                config.logging.log_level = val;
            }
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            SocketError::ConfigError(format!("{}: {e}", constants::ERR_CONFIG_SERIALIZE))
        })?;

        std::fs::write(path, content).map_err(|e| {
            SocketError::ConfigError(format!("{}: {e}", constants::ERR_CONFIG_WRITE))
        })?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.server.validate());
        errors.extend(self.client.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(SocketError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Server-specific configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Listen address (e.g., "127.0.0.1:9000")
    pub address: String,

    /// Pending-connection queue length passed to `listen`
    pub backlog: i32,

    /// Set `SO_REUSEADDR` before binding
    pub reuse_address: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: String::from("127.0.0.1:9000"),
            backlog: DEFAULT_BACKLOG,
            reuse_address: true,
        }
    }
}

impl ServerConfig {
    /// The listen address as a portable [`Address`]
    pub fn bind_address(&self) -> Result<Address> {
        self.address.parse()
    }

    /// Validate server configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.address.is_empty() {
            errors.push("Server address cannot be empty".to_string());
        } else if self.address.parse::<SocketAddrV4>().is_err() {
            errors.push(format!(
                "Invalid server address format: '{}' (expected format: '0.0.0.0:8080')",
                self.address
            ));
        }

        if self.backlog <= 0 {
            errors.push("Backlog must be greater than 0".to_string());
        } else if self.backlog > 65_535 {
            errors.push(format!(
                "Backlog too large: {} (maximum: 65535)",
                self.backlog
            ));
        }

        errors
    }
}

/// Client-specific configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Target server address
    pub address: String,

    /// Size of the buffer handed to each `recv` / `recv_from`
    pub recv_buffer_size: usize,

    /// Set `SO_BROADCAST` on datagram sockets
    pub broadcast: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: String::from("127.0.0.1:9000"),
            recv_buffer_size: DEFAULT_RECV_BUFFER_SIZE,
            broadcast: false,
        }
    }
}

impl ClientConfig {
    /// The target address as a portable [`Address`]
    pub fn target_address(&self) -> Result<Address> {
        self.address.parse()
    }

    /// Validate client configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.address.is_empty() {
            errors.push("Client address cannot be empty".to_string());
        } else if self.address.parse::<SocketAddrV4>().is_err() {
            errors.push(format!(
                "Invalid client address format: '{}' (expected format: '192.168.1.10:8080')",
                self.address
            ));
        }

        if self.recv_buffer_size == 0 {
            errors.push("Receive buffer size must be greater than 0".to_string());
        } else if self.recv_buffer_size > MAX_DATAGRAM_SIZE {
            errors.push(format!(
                "Receive buffer size too large: {} bytes (maximum: {MAX_DATAGRAM_SIZE})",
                self.recv_buffer_size
            ));
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to log to console
    pub log_to_console: bool,

    /// Whether to log to file
    pub log_to_file: bool,

    /// Path to log file (if log_to_file is true)
    pub log_file_path: Option<String>,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("socket-core"),
            log_level: Level::INFO,
            log_to_console: true,
            log_to_file: false,
            log_file_path: None,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        if self.log_to_file {
            if let Some(ref path) = self.log_file_path {
                if let Some(parent) = Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        errors.push(format!(
                            "Log file directory does not exist: {}",
                            parent.display()
                        ));
                    }
                }
            } else {
                errors.push(constants::ERR_LOG_FILE_MISSING.to_string());
            }
        }

        if !self.log_to_console && !self.log_to_file {
            errors
                .push("At least one logging output (console or file) must be enabled".to_string());
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
