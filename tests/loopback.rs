//! End-to-end tests over the loopback interface
//!
//! Every test binds to port 0 and discovers the assigned port through
//! `local_addr`, so tests can run in parallel.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::thread;

use socket_core::{
    Address, AddressFamily, ClientSocket, DatagramIpv4Socket, ServerSocket, Socket, SocketError,
    SocketType, StreamIpv4ClientSocket, StreamIpv4ServerSocket,
};

fn loopback_any_port() -> Address {
    Address::ipv4("127.0.0.1", 0)
}

fn listening_server() -> (StreamIpv4ServerSocket, Address) {
    let server = StreamIpv4ServerSocket::new().unwrap();
    server.set_reuse_address(true).unwrap();
    server.bind(&loopback_any_port()).unwrap();
    server.listen(8).unwrap();
    let address = server.local_addr().unwrap();
    (server, address)
}

fn recv_exact(socket: &ClientSocket, len: usize) -> Vec<u8> {
    let mut collected = Vec::with_capacity(len);
    let mut buf = [0u8; 4096];
    while collected.len() < len {
        let n = socket.recv(&mut buf).unwrap();
        assert!(n > 0, "peer closed after {} of {len} bytes", collected.len());
        collected.extend_from_slice(&buf[..n]);
    }
    collected
}

fn send_all(socket: &ClientSocket, mut data: &[u8]) {
    while !data.is_empty() {
        let n = socket.send(data).unwrap();
        data = &data[n..];
    }
}

#[test]
fn stream_hello_reaches_server() {
    let (server, address) = listening_server();

    let client = thread::spawn(move || {
        let client = StreamIpv4ClientSocket::new().unwrap();
        client.connect(&address).unwrap();
        send_all(&client, b"hello");
    });

    let peer = server.accept().unwrap();
    assert_eq!(recv_exact(&peer, 5), b"hello");

    client.join().unwrap();
}

#[test]
fn stream_echo_round_trip() {
    let (server, address) = listening_server();

    let echo = thread::spawn(move || {
        let peer = server.accept().unwrap();
        let mut buf = [0u8; 1024];
        loop {
            let n = peer.recv(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            send_all(&peer, &buf[..n]);
        }
    });

    let client = StreamIpv4ClientSocket::new().unwrap();
    client.connect(&address).unwrap();
    send_all(&client, b"ping");
    assert_eq!(recv_exact(&client, 4), b"ping");

    // Dropping the client closes the connection and ends the echo loop.
    drop(client);
    echo.join().unwrap();
}

#[test]
fn large_transfer_arrives_in_order() {
    let (server, address) = listening_server();
    let payload: Vec<u8> = (0..256 * 1024).map(|i| (i % 251) as u8).collect();
    let expected = payload.clone();

    let sender = thread::spawn(move || {
        let client = StreamIpv4ClientSocket::new().unwrap();
        client.connect(&address).unwrap();
        send_all(&client, &payload);
    });

    let peer = server.accept().unwrap();
    assert_eq!(recv_exact(&peer, expected.len()), expected);
    sender.join().unwrap();

    let mut buf = [0u8; 16];
    assert_eq!(peer.recv(&mut buf).unwrap(), 0, "orderly shutdown reads as 0");
}

#[test]
fn accepted_socket_knows_both_ends() {
    let (server, address) = listening_server();

    let client = StreamIpv4ClientSocket::new().unwrap();
    client.connect(&address).unwrap();
    let client_local = client.local_addr().unwrap();

    let peer = server.accept().unwrap();
    assert_eq!(peer.family(), AddressFamily::Ipv4);
    assert_eq!(peer.socket_type(), SocketType::Stream);
    assert_eq!(peer.local_addr().unwrap(), address);
    assert_eq!(peer.peer_addr().unwrap(), client_local);
    assert_eq!(client.peer_addr().unwrap(), address);
}

#[test]
fn several_clients_are_accepted_in_turn() {
    let (server, address) = listening_server();

    let clients: Vec<_> = (0u8..3)
        .map(|id| {
            let client = StreamIpv4ClientSocket::new().unwrap();
            client.connect(&address).unwrap();
            send_all(&client, &[id]);
            client
        })
        .collect();

    let mut seen: Vec<u8> = (0..clients.len())
        .map(|_| recv_exact(&server.accept().unwrap(), 1)[0])
        .collect();
    seen.sort_unstable();
    assert_eq!(seen, vec![0, 1, 2]);
}

#[test]
fn connect_to_closed_port_is_refused() {
    // Reserve a port, then release it so nothing listens there.
    let address = {
        let probe = StreamIpv4ServerSocket::new().unwrap();
        probe.bind(&loopback_any_port()).unwrap();
        probe.local_addr().unwrap()
    };

    let client = StreamIpv4ClientSocket::new().unwrap();
    let err = client.connect(&address).unwrap_err();
    assert!(matches!(err, SocketError::Connect(_)));
    assert_eq!(err.native().unwrap().code(), libc::ECONNREFUSED);
    assert!(err.to_string().starts_with("Couldn't connect! Reason: "));
}

#[test]
fn bind_conflict_is_reported() {
    let (_server, address) = listening_server();

    let second = StreamIpv4ServerSocket::new().unwrap();
    let err = second.bind(&address).unwrap_err();
    assert!(matches!(err, SocketError::Bind(_)));
    assert_eq!(err.native().unwrap().code(), libc::EADDRINUSE);
}

#[test]
fn malformed_address_never_reaches_the_network() {
    let socket = StreamIpv4ClientSocket::new().unwrap();
    for ip in ["", "localhost", "1.2.3", "256.0.0.1", "1.2.3.4 "] {
        let err = socket.connect(&Address::ipv4(ip, 80)).unwrap_err();
        assert_eq!(err, SocketError::InvalidAddress(ip.to_string()), "ip {ip:?}");
    }
}

#[test]
fn datagram_reports_sender_address() {
    let receiver = DatagramIpv4Socket::new().unwrap();
    receiver.bind(&loopback_any_port()).unwrap();
    let receiver_address = receiver.local_addr().unwrap();

    let sender = DatagramIpv4Socket::new().unwrap();
    sender.bind(&loopback_any_port()).unwrap();
    let sender_address = sender.local_addr().unwrap();

    assert_eq!(sender.send_to(b"datagram", &receiver_address).unwrap(), 8);

    let mut buf = [0u8; 64];
    let (n, from) = receiver.recv_from(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"datagram");
    assert_eq!(from, sender_address);

    // Reply to whoever sent it.
    receiver.send_to(b"ack", &from).unwrap();
    let (n, from) = sender.recv_from(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"ack");
    assert_eq!(from, receiver_address);
}

#[test]
fn datagram_boundaries_are_preserved() {
    let receiver = DatagramIpv4Socket::new().unwrap();
    receiver.bind(&loopback_any_port()).unwrap();
    let target = receiver.local_addr().unwrap();

    let sender = DatagramIpv4Socket::new().unwrap();
    sender.send_to(b"one", &target).unwrap();
    sender.send_to(b"three", &target).unwrap();

    let mut buf = [0u8; 64];
    let (n, _) = receiver.recv_from(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"one");
    let (n, _) = receiver.recv_from(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"three");
}

#[test]
fn broadcast_option_can_be_enabled() {
    let socket = DatagramIpv4Socket::new().unwrap();
    socket.set_broadcast(true).unwrap();
    socket.set_broadcast(false).unwrap();
}

#[test]
fn generic_roles_work_without_fixed_wrappers() {
    let server = ServerSocket::new(AddressFamily::Ipv4, SocketType::Stream).unwrap();
    server.bind(&loopback_any_port()).unwrap();
    server.listen(1).unwrap();
    let address = server.local_addr().unwrap();

    let client = ClientSocket::new(AddressFamily::Ipv4, SocketType::Stream).unwrap();
    client.connect(&address).unwrap();
    send_all(&client, b"generic");

    let peer = server.accept().unwrap();
    assert_eq!(recv_exact(&peer, 7), b"generic");
}

#[test]
fn moved_socket_stays_usable() {
    let (server, address) = listening_server();

    let client = StreamIpv4ClientSocket::new().unwrap();
    client.connect(&address).unwrap();

    // Move through the wrapper layers and into a holder.
    let inner: ClientSocket = client.into_inner();
    let mut slot = Some(inner);
    let moved = slot.take().unwrap();
    send_all(&moved, b"moved");

    let peer = server.accept().unwrap();
    assert_eq!(recv_exact(&peer, 5), b"moved");
}

#[test]
fn move_assignment_releases_previous_handle() {
    let (server, address) = listening_server();

    let mut current = StreamIpv4ClientSocket::new().unwrap();
    current.connect(&address).unwrap();
    let first_peer = server.accept().unwrap();

    let replacement = StreamIpv4ClientSocket::new().unwrap();
    replacement.connect(&address).unwrap();
    let second_peer = server.accept().unwrap();

    // Assigning drops the old socket, which closes the first connection.
    current = replacement;

    let mut buf = [0u8; 8];
    assert_eq!(first_peer.recv(&mut buf).unwrap(), 0);

    send_all(&current, b"new");
    assert_eq!(recv_exact(&second_peer, 3), b"new");
}

#[test]
fn roles_unwrap_to_base_socket() {
    let socket: Socket = StreamIpv4ServerSocket::new().unwrap().into_inner().into_socket();
    assert_eq!(socket.family(), AddressFamily::Ipv4);
    assert_eq!(socket.socket_type(), SocketType::Stream);

    let socket: Socket = ClientSocket::from(DatagramIpv4Socket::new().unwrap()).into();
    assert_eq!(socket.socket_type(), SocketType::Datagram);
}
