//! # socket-core
//!
//! A small, portable socket abstraction: strongly-typed blocking socket roles
//! over a single owned native handle, plus a strict MAC address parser.
//!
//! ## Layers
//! - **core**: the portable vocabulary (`AddressFamily`, `SocketType`,
//!   `OptionLevel`, `OptionName`, `Address`) and `MacAddress` parsing
//! - **socket**: `Socket`, `ClientSocket`, `ServerSocket` and the IPv4
//!   conveniences `StreamIpv4ClientSocket`, `StreamIpv4ServerSocket`,
//!   `DatagramIpv4Socket`
//! - **config / utils**: TOML configuration, logging setup, metrics
//!
//! The native socket API is reached only through a private platform layer
//! that translates the portable vocabulary to native constants and
//! structures and renders native failures as [`NativeError`].
//!
//! ## Example
//! ```rust,no_run
//! use socket_core::{Address, DatagramIpv4Socket};
//!
//! # fn main() -> socket_core::Result<()> {
//! socket_core::init();
//!
//! let socket = DatagramIpv4Socket::new()?;
//! socket.bind(&Address::ipv4("0.0.0.0", 5000))?;
//!
//! let mut buf = [0u8; 1500];
//! let (n, from) = socket.recv_from(&mut buf)?;
//! socket.send_to(&buf[..n], &from)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod socket;
mod sys;
pub mod utils;

pub use crate::core::{parse_mac, Address, AddressFamily, MacAddress, OptionLevel, OptionName, SocketType};
pub use crate::error::{NativeError, Result, SocketError};
pub use crate::socket::{
    ClientSocket, DatagramIpv4Socket, ServerSocket, Socket, StreamIpv4ClientSocket,
    StreamIpv4ServerSocket,
};

/// Initialize the native network subsystem.
///
/// Idempotent and thread-safe; every socket constructor calls it too, so an
/// explicit call is only needed to pay the startup cost at a chosen time.
/// There is no matching teardown.
pub fn init() {
    sys::ensure_initialized();
}
