//! # Error Types
//!
//! Error handling for the socket layer and the MAC address parser.
//!
//! Failures come in two tiers:
//! - **Runtime failures** are returned as [`SocketError`]. A native call that
//!   fails carries a [`NativeError`] with the platform error code and its
//!   rendered description. Malformed textual input (IPv4 text, MAC text,
//!   configuration) has its own variants naming the rule that failed.
//! - **Logic faults** (a native value outside the portable vocabulary reaching
//!   the translation boundary) are programming errors and panic instead.
//!
//! Nothing in this crate retries on failure.
//!
//! ## Example Usage
//! ```rust,no_run
//! use socket_core::error::{Result, SocketError};
//! use socket_core::{Address, StreamIpv4ClientSocket};
//! use tracing::{error, info};
//!
//! fn greet(target: &Address) -> Result<usize> {
//!     let client = StreamIpv4ClientSocket::new()?;
//!     client.connect(target)?;
//!     client.send(b"hello")
//! }
//!
//! fn main() {
//!     let target = Address::ipv4("127.0.0.1", 9000);
//!     match greet(&target) {
//!         Ok(sent) => info!(sent, "Greeting sent"),
//!         Err(SocketError::Connect(e)) => error!(code = e.code(), "Peer unreachable: {e}"),
//!         Err(e) => error!(error = %e, "Greeting failed"),
//!     }
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Native error codes without an entry in the description table
    pub const ERR_NO_DESCRIPTION: &str = "No description available";

    /// Configuration errors
    pub const ERR_CONFIG_OPEN: &str = "Failed to open config file";
    pub const ERR_CONFIG_READ: &str = "Failed to read config file";
    pub const ERR_CONFIG_PARSE: &str = "Failed to parse TOML";
    pub const ERR_CONFIG_SERIALIZE: &str = "Failed to serialize config";
    pub const ERR_CONFIG_WRITE: &str = "Failed to write config file";

    /// Logging setup errors
    pub const ERR_LOG_FILE_MISSING: &str = "log_file_path must be specified when log_to_file is true";
    pub const ERR_LOG_FILE_OPEN: &str = "Failed to open log file";
    pub const ERR_LOG_INIT: &str = "Failed to install tracing subscriber";
}

/// A failed native socket call: the platform error code plus its rendered
/// description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeError {
    code: i32,
    description: &'static str,
}

impl NativeError {
    /// Build from a raw platform error code, rendering its description.
    pub fn from_code(code: i32) -> Self {
        Self {
            code,
            description: crate::sys::describe_error(code),
        }
    }

    /// Capture the calling thread's last platform error.
    pub(crate) fn last() -> Self {
        let code = std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
        Self::from_code(code)
    }

    /// Raw platform error code (`errno` on Unix)
    pub fn code(&self) -> i32 {
        self.code
    }

    /// Human-readable description of the code
    pub fn description(&self) -> &'static str {
        self.description
    }
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (os error {})", self.description, self.code)
    }
}

impl std::error::Error for NativeError {}

// SocketError is the primary error type for all socket and parser operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SocketError {
    #[error("Failed to create socket! Reason: {0}")]
    Construction(NativeError),

    #[error("Failed to bind socket! Reason: {0}")]
    Bind(NativeError),

    #[error("Failed to set option! Reason: {0}")]
    SetOption(NativeError),

    #[error("Failed to query socket! Reason: {0}")]
    Query(NativeError),

    #[error("Couldn't connect! Reason: {0}")]
    Connect(NativeError),

    #[error("Failed to send! Reason: {0}")]
    Send(NativeError),

    #[error("Failed to receive! Reason: {0}")]
    Receive(NativeError),

    #[error("Failed to listen! Reason: {0}")]
    Listen(NativeError),

    #[error("Failed to accept socket! Reason: {0}")]
    Accept(NativeError),

    #[error("Invalid IPv4 address: '{0}'")]
    InvalidAddress(String),

    #[error("Invalid MAC address length: {0} (expected 12 or 17)")]
    InvalidMacLength(usize),

    #[error("Invalid MAC address separator: {0:?} (expected ':' or '-')")]
    InvalidMacSeparator(char),

    #[error("Invalid MAC address format: inconsistent separator at position {position}")]
    InvalidMacFormat { position: usize },

    #[error("Invalid hex digit {found:?} at position {position}")]
    InvalidHexDigit { position: usize, found: char },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SocketError {
    /// The native error behind this failure, if it came from a native call
    pub fn native(&self) -> Option<&NativeError> {
        match self {
            SocketError::Construction(e)
            | SocketError::Bind(e)
            | SocketError::SetOption(e)
            | SocketError::Query(e)
            | SocketError::Connect(e)
            | SocketError::Send(e)
            | SocketError::Receive(e)
            | SocketError::Listen(e)
            | SocketError::Accept(e) => Some(e),
            _ => None,
        }
    }
}

/// Type alias for Results using SocketError
pub type Result<T> = std::result::Result<T, SocketError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_error_display_includes_code_and_description() {
        let err = NativeError::from_code(libc::ECONNREFUSED);
        let text = err.to_string();
        assert!(text.contains(&format!("os error {}", libc::ECONNREFUSED)));
        assert!(text.starts_with(err.description()));
        assert_ne!(err.description(), constants::ERR_NO_DESCRIPTION);
    }

    #[test]
    fn unmapped_code_falls_back_to_generic_description() {
        let err = NativeError::from_code(-12345);
        assert_eq!(err.description(), constants::ERR_NO_DESCRIPTION);
        assert_eq!(err.code(), -12345);
    }

    #[test]
    fn native_accessor_only_for_native_failures() {
        let native = NativeError::from_code(libc::EINVAL);
        assert_eq!(SocketError::Bind(native).native(), Some(&native));
        assert_eq!(SocketError::InvalidMacLength(3).native(), None);
        assert_eq!(
            SocketError::InvalidAddress("x".to_string()).native(),
            None
        );
    }

    #[test]
    fn failure_messages_name_the_operation() {
        let native = NativeError::from_code(libc::EADDRINUSE);
        assert!(SocketError::Bind(native)
            .to_string()
            .starts_with("Failed to bind socket!"));
        assert!(SocketError::Connect(native)
            .to_string()
            .starts_with("Couldn't connect!"));
        assert_eq!(
            SocketError::InvalidMacSeparator('.').to_string(),
            "Invalid MAC address separator: '.' (expected ':' or '-')"
        );
    }
}
