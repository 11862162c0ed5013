//! # Socket Roles
//!
//! Blocking socket roles over a single owned native handle.
//!
//! ## Components
//! - **Socket**: owns the handle; bind, option setting, local address
//! - **ClientSocket**: connect, send, recv
//! - **ServerSocket**: listen, accept
//! - **StreamIpv4ClientSocket / StreamIpv4ServerSocket / DatagramIpv4Socket**:
//!   roles pinned to IPv4 and a fixed socket type; the datagram socket adds
//!   `send_to` / `recv_from`
//!
//! Roles compose by containment. Each wrapper exposes its own operations and
//! dereferences to the role it wraps, so base operations stay reachable while
//! role-specific ones are only callable on the matching type.
//!
//! ## Ownership
//! Every role value owns its handle exclusively. Moving a role moves the
//! handle; dropping it closes the handle once. Partial sends and receives
//! are reported as counts and never retried internally.
//!
//! ```rust,no_run
//! use socket_core::{Address, StreamIpv4ClientSocket, StreamIpv4ServerSocket};
//!
//! # fn main() -> socket_core::Result<()> {
//! let server = StreamIpv4ServerSocket::new()?;
//! server.bind(&Address::ipv4("127.0.0.1", 0))?;
//! server.listen(16)?;
//! let target = server.local_addr()?;
//!
//! let client = StreamIpv4ClientSocket::new()?;
//! client.connect(&target)?;
//! client.send(b"ping")?;
//!
//! let peer = server.accept()?;
//! let mut buf = [0u8; 4];
//! let n = peer.recv(&mut buf)?;
//! assert_eq!(&buf[..n], b"ping");
//! # Ok(())
//! # }
//! ```

mod client;
mod fixed;
mod handle;
mod server;

pub use client::ClientSocket;
pub use fixed::{DatagramIpv4Socket, StreamIpv4ClientSocket, StreamIpv4ServerSocket};
pub use server::ServerSocket;

use std::os::unix::io::{AsRawFd, RawFd};

use tracing::{debug, instrument};

use crate::core::{Address, AddressFamily, OptionLevel, OptionName, SocketType};
use crate::error::{NativeError, Result, SocketError};
use crate::sys;
use crate::utils::metrics::global_metrics;

use handle::Handle;

/// Wrap a native failure in the error kind of the failing operation,
/// counting it on the way.
pub(crate) fn native_failure(
    kind: fn(NativeError) -> SocketError,
) -> impl Fn(NativeError) -> SocketError {
    move |e| {
        global_metrics().native_error();
        debug!(error = %e, "Native socket call failed");
        kind(e)
    }
}

/// Base socket role: owns the native handle, binds, sets options.
#[derive(Debug)]
pub struct Socket {
    handle: Handle,
    family: AddressFamily,
    socket_type: SocketType,
}

impl Socket {
    /// Open a new native handle.
    ///
    /// Initializes the network subsystem on first use anywhere in the process.
    pub fn new(family: AddressFamily, socket_type: SocketType) -> Result<Self> {
        let handle = Handle::open(family, socket_type)?;
        Ok(Self {
            handle,
            family,
            socket_type,
        })
    }

    /// Wrap a handle obtained elsewhere (e.g. from `accept`), reading its
    /// family and type back from the native API. A failed query is reported
    /// as `kind`, the error of the operation that produced the handle, and
    /// the handle is still released.
    pub(crate) fn from_handle(
        handle: Handle,
        kind: fn(NativeError) -> SocketError,
    ) -> Result<Self> {
        sys::ensure_initialized();

        let socket_type = sys::socket_type(handle.raw()).map_err(native_failure(kind))?;
        let local = sys::local_name(handle.raw()).map_err(native_failure(kind))?;
        let family = sys::address_from_native(&local).family;

        Ok(Self {
            handle,
            family,
            socket_type,
        })
    }

    #[instrument(level = "debug", skip(self), fields(handle = self.handle.raw()))]
    pub fn bind(&self, address: &Address) -> Result<()> {
        let native = sys::address_to_native(address)?;
        sys::bind(self.handle.raw(), &native).map_err(native_failure(SocketError::Bind))?;
        debug!(%address, "Socket bound");
        Ok(())
    }

    /// Set a socket option from the raw bytes of `value`.
    ///
    /// The caller picks a `T` whose in-memory representation is what the
    /// native option expects; socket-level flags such as
    /// [`OptionName::Broadcast`] take an `i32`. Prefer the typed setters where
    /// one exists.
    pub fn set_opt<T: Copy>(&self, level: OptionLevel, name: OptionName, value: &T) -> Result<()> {
        sys::set_option(self.handle.raw(), level, name, value)
            .map_err(native_failure(SocketError::SetOption))?;
        debug!(handle = self.handle.raw(), ?level, ?name, "Socket option set");
        Ok(())
    }

    /// Permit sending datagrams to broadcast addresses
    pub fn set_broadcast(&self, enabled: bool) -> Result<()> {
        self.set_opt(OptionLevel::Socket, OptionName::Broadcast, &i32::from(enabled))
    }

    pub fn set_reuse_address(&self, enabled: bool) -> Result<()> {
        self.set_opt(OptionLevel::Socket, OptionName::ReuseAddress, &i32::from(enabled))
    }

    pub fn set_keep_alive(&self, enabled: bool) -> Result<()> {
        self.set_opt(OptionLevel::Socket, OptionName::KeepAlive, &i32::from(enabled))
    }

    /// Address the socket is bound to. After binding to port 0 this reports
    /// the ephemeral port the system picked.
    pub fn local_addr(&self) -> Result<Address> {
        let native =
            sys::local_name(self.handle.raw()).map_err(native_failure(SocketError::Query))?;
        Ok(sys::address_from_native(&native))
    }

    pub fn family(&self) -> AddressFamily {
        self.family
    }

    pub fn socket_type(&self) -> SocketType {
        self.socket_type
    }

    #[inline]
    pub(crate) fn raw(&self) -> sys::RawHandle {
        self.handle.raw()
    }
}

impl AsRawFd for Socket {
    fn as_raw_fd(&self) -> RawFd {
        self.handle.raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_socket_reports_its_configuration() {
        let socket = Socket::new(AddressFamily::Ipv4, SocketType::Datagram).unwrap();
        assert_eq!(socket.family(), AddressFamily::Ipv4);
        assert_eq!(socket.socket_type(), SocketType::Datagram);
        assert!(socket.as_raw_fd() >= 0);
    }

    #[test]
    fn bind_to_ephemeral_port_reports_assigned_port() {
        let socket = Socket::new(AddressFamily::Ipv4, SocketType::Stream).unwrap();
        socket.bind(&Address::ipv4("127.0.0.1", 0)).unwrap();

        let local = socket.local_addr().unwrap();
        assert_eq!(local.ip, "127.0.0.1");
        assert_ne!(local.port, 0);
    }

    #[test]
    fn bind_with_malformed_ip_is_invalid_address() {
        let socket = Socket::new(AddressFamily::Ipv4, SocketType::Stream).unwrap();
        let err = socket.bind(&Address::ipv4("300.1.1.1", 0)).unwrap_err();
        assert_eq!(err, SocketError::InvalidAddress("300.1.1.1".to_string()));
    }

    #[test]
    fn bind_to_foreign_address_fails_with_native_error() {
        let socket = Socket::new(AddressFamily::Ipv4, SocketType::Datagram).unwrap();
        // TEST-NET-3, never assigned to a local interface
        let err = socket.bind(&Address::ipv4("203.0.113.7", 0)).unwrap_err();
        match err {
            SocketError::Bind(native) => assert_eq!(native.code(), libc::EADDRNOTAVAIL),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn failed_operation_leaves_socket_usable() {
        let socket = Socket::new(AddressFamily::Ipv4, SocketType::Datagram).unwrap();
        assert!(socket.bind(&Address::ipv4("203.0.113.7", 0)).is_err());
        socket.bind(&Address::ipv4("127.0.0.1", 0)).unwrap();
    }

    #[test]
    fn typed_setters_reach_native_option() {
        let socket = Socket::new(AddressFamily::Ipv4, SocketType::Datagram).unwrap();
        socket.set_broadcast(true).unwrap();

        let mut value: libc::c_int = 0;
        let mut len = std::mem::size_of::<libc::c_int>() as libc::socklen_t;
        let rc = unsafe {
            libc::getsockopt(
                socket.as_raw_fd(),
                libc::SOL_SOCKET,
                libc::SO_BROADCAST,
                &mut value as *mut libc::c_int as *mut libc::c_void,
                &mut len,
            )
        };
        assert_eq!(rc, 0);
        assert_ne!(value, 0);

        socket.set_reuse_address(true).unwrap();
        socket.set_keep_alive(false).unwrap();
    }

    #[test]
    fn set_opt_with_undersized_value_fails() {
        let socket = Socket::new(AddressFamily::Ipv4, SocketType::Datagram).unwrap();
        let err = socket
            .set_opt(OptionLevel::Socket, OptionName::Broadcast, &0u8)
            .unwrap_err();
        assert!(matches!(err, SocketError::SetOption(_)));
    }

    #[test]
    fn moving_a_socket_keeps_its_handle() {
        let socket = Socket::new(AddressFamily::Ipv4, SocketType::Stream).unwrap();
        let raw = socket.as_raw_fd();

        let moved = socket;
        let boxed = Box::new(moved);
        assert_eq!(boxed.as_raw_fd(), raw);
        assert!(boxed.local_addr().is_ok());
    }
}
