use std::ops::Deref;

use tracing::{debug, instrument};

use crate::core::{AddressFamily, SocketType};
use crate::error::{Result, SocketError};
use crate::sys;
use crate::utils::metrics::{global_metrics, Timer};

use super::handle::Handle;
use super::{native_failure, ClientSocket, Socket};

/// Passive role: listen, accept.
#[derive(Debug)]
pub struct ServerSocket {
    socket: Socket,
}

impl ServerSocket {
    pub fn new(family: AddressFamily, socket_type: SocketType) -> Result<Self> {
        Ok(Self {
            socket: Socket::new(family, socket_type)?,
        })
    }

    /// Mark the socket passive with at most `backlog` pending connections
    #[instrument(level = "debug", skip(self), fields(handle = self.socket.raw()))]
    pub fn listen(&self, backlog: i32) -> Result<()> {
        sys::listen(self.socket.raw(), backlog).map_err(native_failure(SocketError::Listen))?;
        debug!("Listening");
        Ok(())
    }

    /// Block until a peer connects and return a client socket that owns the
    /// new connection's handle.
    #[instrument(level = "debug", skip(self), fields(handle = self.socket.raw()))]
    pub fn accept(&self) -> Result<ClientSocket> {
        let _timer = Timer::start("accept");
        let raw = sys::accept(self.socket.raw()).map_err(native_failure(SocketError::Accept))?;

        // Owned from here on, so it is closed even if classification fails
        let handle = Handle::from_raw(raw);
        global_metrics().connection_accepted();

        let peer = ClientSocket::from_socket(Socket::from_handle(handle, SocketError::Accept)?);
        debug!(peer_handle = raw, "Connection accepted");
        Ok(peer)
    }

    pub fn into_socket(self) -> Socket {
        self.socket
    }
}

impl Deref for ServerSocket {
    type Target = Socket;

    fn deref(&self) -> &Self::Target {
        &self.socket
    }
}

impl From<ServerSocket> for Socket {
    fn from(server: ServerSocket) -> Self {
        server.socket
    }
}
