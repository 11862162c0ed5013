//! Portable socket vocabulary.
//!
//! These closed enumerations are the only values the rest of the crate hands
//! to the translation boundary. Every member has exactly one native
//! counterpart; adding a member means adding its translation entry in
//! `sys` in the same change.

use crate::error::SocketError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Address family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressFamily {
    /// IPv4
    Ipv4,
}

/// Socket type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocketType {
    /// Connection-oriented byte stream
    Stream,
    /// Connectionless datagrams
    Datagram,
}

/// Option level (the native protocol layer an option belongs to)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionLevel {
    /// Socket-level options
    Socket,
}

/// Option name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionName {
    /// Permit sending to broadcast addresses
    Broadcast,
    /// Allow rebinding a local address still in TIME_WAIT
    ReuseAddress,
    /// Periodic keep-alive probes on idle connections
    KeepAlive,
}

/// Portable socket address: family, textual IP and port.
///
/// The IP text is not validated here. It is parsed by the native API when the
/// address crosses the translation boundary, and a malformed value surfaces
/// then as [`SocketError::InvalidAddress`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    pub family: AddressFamily,
    pub ip: String,
    pub port: u16,
}

impl Address {
    pub fn new(family: AddressFamily, ip: impl Into<String>, port: u16) -> Self {
        Self {
            family,
            ip: ip.into(),
            port,
        }
    }

    /// IPv4 address from dotted-quad text and a port
    pub fn ipv4(ip: impl Into<String>, port: u16) -> Self {
        Self::new(AddressFamily::Ipv4, ip, port)
    }

    /// `0.0.0.0` with port 0: any interface, ephemeral port
    pub fn ipv4_any() -> Self {
        Self::ipv4("0.0.0.0", 0)
    }

    /// Same IP and family with a different port
    pub fn with_port(&self, port: u16) -> Self {
        Self {
            port,
            ..self.clone()
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ip, self.port)
    }
}

/// Parses `ip:port`. Only the port is checked; the IP text is left to the
/// native parser.
impl FromStr for Address {
    type Err = SocketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (ip, port) = s
            .rsplit_once(':')
            .ok_or_else(|| SocketError::InvalidAddress(s.to_string()))?;

        if ip.is_empty() {
            return Err(SocketError::InvalidAddress(s.to_string()));
        }

        let port = port
            .parse::<u16>()
            .map_err(|_| SocketError::InvalidAddress(s.to_string()))?;

        Ok(Self::ipv4(ip, port))
    }
}
