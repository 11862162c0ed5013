use std::ops::Deref;

use tracing::{debug, instrument, trace};

use crate::core::{Address, AddressFamily, SocketType};
use crate::error::{Result, SocketError};
use crate::sys;
use crate::utils::metrics::{global_metrics, Timer};

use super::{native_failure, Socket};

/// Connecting role: connect, send, recv.
///
/// Also the type handed out by [`ServerSocket::accept`](super::ServerSocket::accept)
/// for each established peer.
#[derive(Debug)]
pub struct ClientSocket {
    socket: Socket,
}

impl ClientSocket {
    pub fn new(family: AddressFamily, socket_type: SocketType) -> Result<Self> {
        Ok(Self {
            socket: Socket::new(family, socket_type)?,
        })
    }

    pub(crate) fn from_socket(socket: Socket) -> Self {
        Self { socket }
    }

    /// Connect to `address`. Blocks until the connection is established or
    /// refused. On a datagram socket this fixes the default peer for
    /// `send`/`recv`.
    #[instrument(level = "debug", skip(self), fields(handle = self.socket.raw()))]
    pub fn connect(&self, address: &Address) -> Result<()> {
        let _timer = Timer::start("connect");
        let native = sys::address_to_native(address)?;
        sys::connect(self.socket.raw(), &native).map_err(native_failure(SocketError::Connect))?;
        global_metrics().connection_established();
        debug!(%address, "Connected");
        Ok(())
    }

    /// Send bytes from `buffer`.
    ///
    /// Returns how many bytes the native layer accepted, which may be fewer
    /// than `buffer.len()`. The remainder is not retried.
    pub fn send(&self, buffer: &[u8]) -> Result<usize> {
        let sent = sys::send(self.socket.raw(), buffer).map_err(native_failure(SocketError::Send))?;
        global_metrics().sent(sent);
        trace!(handle = self.socket.raw(), requested = buffer.len(), sent, "send");
        Ok(sent)
    }

    /// Receive into `buffer`.
    ///
    /// Returns the number of bytes read. `0` on a stream socket means the
    /// peer shut down its sending side; it is not an error.
    pub fn recv(&self, buffer: &mut [u8]) -> Result<usize> {
        let received =
            sys::recv(self.socket.raw(), buffer).map_err(native_failure(SocketError::Receive))?;
        global_metrics().received(received);
        trace!(handle = self.socket.raw(), capacity = buffer.len(), received, "recv");
        Ok(received)
    }

    /// Address of the connected peer
    pub fn peer_addr(&self) -> Result<Address> {
        let native =
            sys::peer_name(self.socket.raw()).map_err(native_failure(SocketError::Query))?;
        Ok(sys::address_from_native(&native))
    }

    pub fn into_socket(self) -> Socket {
        self.socket
    }
}

impl Deref for ClientSocket {
    type Target = Socket;

    fn deref(&self) -> &Self::Target {
        &self.socket
    }
}

impl From<ClientSocket> for Socket {
    fn from(client: ClientSocket) -> Self {
        client.socket
    }
}
