//! Example: Blocking TCP echo server
//!
//! Serves one connection at a time, echoing every byte back until the peer
//! closes. Settings come from `SOCKET_CORE_*` environment variables.
//!
//! Run with: `cargo run --example echo_server`
//! Then try: `nc 127.0.0.1 9000`

use socket_core::config::SocketConfig;
use socket_core::utils::logging::init_logging;
use socket_core::utils::global_metrics;
use socket_core::{ClientSocket, StreamIpv4ServerSocket};
use tracing::{info, warn};

fn serve(peer: &ClientSocket, buffer: &mut [u8]) -> socket_core::Result<u64> {
    let mut echoed = 0u64;
    loop {
        let n = peer.recv(buffer)?;
        if n == 0 {
            return Ok(echoed);
        }
        let mut pending = &buffer[..n];
        while !pending.is_empty() {
            let sent = peer.send(pending)?;
            pending = &pending[sent..];
        }
        echoed += n as u64;
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = SocketConfig::from_env()?;
    config.validate_strict()?;
    init_logging(&config.logging)?;

    let server = StreamIpv4ServerSocket::new()?;
    server.set_reuse_address(config.server.reuse_address)?;
    server.bind(&config.server.bind_address()?)?;
    server.listen(config.server.backlog)?;
    info!(address = %server.local_addr()?, "Echo server listening");

    let mut buffer = vec![0u8; config.client.recv_buffer_size];
    loop {
        let peer = match server.accept() {
            Ok(peer) => peer,
            Err(e) => {
                warn!(error = %e, "Accept failed");
                continue;
            }
        };

        handle_connection(&peer, &mut buffer);
        global_metrics().log_metrics();
    }
}

/// Serve one accepted peer. Failures end this connection only; the server
/// keeps accepting. Returns the bytes echoed if the peer closed cleanly.
fn handle_connection(peer: &ClientSocket, buffer: &mut [u8]) -> Option<u64> {
    let from = match peer.peer_addr() {
        Ok(from) => from,
        Err(e) => {
            warn!(error = %e, "Peer went away before it could be served");
            return None;
        }
    };

    match serve(peer, buffer) {
        Ok(bytes) => {
            info!(%from, bytes, "Connection closed");
            Some(bytes)
        }
        Err(e) => {
            warn!(%from, error = %e, "Connection aborted");
            None
        }
    }
}
