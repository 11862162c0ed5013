//! Roles pinned to IPv4 and a fixed socket type.

use std::ops::Deref;

use tracing::trace;

use crate::core::{Address, AddressFamily, SocketType};
use crate::error::{Result, SocketError};
use crate::sys;
use crate::utils::metrics::global_metrics;

use super::{native_failure, ClientSocket, ServerSocket};

/// IPv4 TCP client
#[derive(Debug)]
pub struct StreamIpv4ClientSocket(ClientSocket);

impl StreamIpv4ClientSocket {
    pub fn new() -> Result<Self> {
        ClientSocket::new(AddressFamily::Ipv4, SocketType::Stream).map(Self)
    }

    pub fn into_inner(self) -> ClientSocket {
        self.0
    }
}

impl Deref for StreamIpv4ClientSocket {
    type Target = ClientSocket;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<StreamIpv4ClientSocket> for ClientSocket {
    fn from(socket: StreamIpv4ClientSocket) -> Self {
        socket.0
    }
}

/// IPv4 TCP listener
#[derive(Debug)]
pub struct StreamIpv4ServerSocket(ServerSocket);

impl StreamIpv4ServerSocket {
    pub fn new() -> Result<Self> {
        ServerSocket::new(AddressFamily::Ipv4, SocketType::Stream).map(Self)
    }

    pub fn into_inner(self) -> ServerSocket {
        self.0
    }
}

impl Deref for StreamIpv4ServerSocket {
    type Target = ServerSocket;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<StreamIpv4ServerSocket> for ServerSocket {
    fn from(socket: StreamIpv4ServerSocket) -> Self {
        socket.0
    }
}

/// IPv4 UDP socket.
///
/// Usable connectionless through [`send_to`](Self::send_to) and
/// [`recv_from`](Self::recv_from), or connected through the client role it
/// dereferences to.
#[derive(Debug)]
pub struct DatagramIpv4Socket(ClientSocket);

impl DatagramIpv4Socket {
    pub fn new() -> Result<Self> {
        ClientSocket::new(AddressFamily::Ipv4, SocketType::Datagram).map(Self)
    }

    /// Send one datagram to `destination`. Returns the bytes sent.
    pub fn send_to(&self, buffer: &[u8], destination: &Address) -> Result<usize> {
        let native = sys::address_to_native(destination)?;
        let sent = sys::send_to(self.0.raw(), buffer, &native)
            .map_err(native_failure(SocketError::Send))?;
        global_metrics().datagram_sent(sent);
        trace!(handle = self.0.raw(), %destination, sent, "send_to");
        Ok(sent)
    }

    /// Receive one datagram. Returns the bytes read and the address it came
    /// from. A datagram longer than `buffer` is truncated to fit.
    pub fn recv_from(&self, buffer: &mut [u8]) -> Result<(usize, Address)> {
        let (received, native) = sys::recv_from(self.0.raw(), buffer)
            .map_err(native_failure(SocketError::Receive))?;
        let source = sys::address_from_native(&native);
        global_metrics().datagram_received(received);
        trace!(handle = self.0.raw(), %source, received, "recv_from");
        Ok((received, source))
    }

    pub fn into_inner(self) -> ClientSocket {
        self.0
    }
}

impl Deref for DatagramIpv4Socket {
    type Target = ClientSocket;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<DatagramIpv4Socket> for ClientSocket {
    fn from(socket: DatagramIpv4Socket) -> Self {
        socket.0
    }
}
