//! Example: UDP ping over loopback
//!
//! Binds a responder on an ephemeral port, then sends numbered pings to it
//! from a second socket and prints each reply with the address it came from.
//!
//! Run with: `cargo run --example udp_ping`

use std::thread;

use socket_core::{Address, DatagramIpv4Socket, MacAddress};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    socket_core::init();

    let responder = DatagramIpv4Socket::new()?;
    responder.bind(&Address::ipv4("127.0.0.1", 0))?;
    let target = responder.local_addr()?;
    println!("Responder bound to {target}");

    let echo = thread::spawn(move || -> socket_core::Result<()> {
        let mut buf = [0u8; 64];
        for _ in 0..3 {
            let (n, from) = responder.recv_from(&mut buf)?;
            responder.send_to(&buf[..n], &from)?;
        }
        Ok(())
    });

    let pinger = DatagramIpv4Socket::new()?;
    pinger.bind(&Address::ipv4("127.0.0.1", 0))?;

    // Payload carries a hardware address to show off the parser.
    let station: MacAddress = "02-00-5E-10-00-01".parse()?;
    let mut buf = [0u8; 64];
    for seq in 0..3u8 {
        let mut payload = vec![seq];
        payload.extend_from_slice(station.as_bytes());
        pinger.send_to(&payload, &target)?;

        let (n, from) = pinger.recv_from(&mut buf)?;
        println!("reply {seq} from {from}: {n} bytes, station {station}");
    }

    echo.join().map_err(|_| "responder thread panicked")??;
    Ok(())
}
