#![no_main]

use libfuzzer_sys::fuzz_target;
use socket_core::{Address, DatagramIpv4Socket};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Parsing, then handing the result to the native conversion, must never panic.
    if let Ok(address) = text.parse::<Address>() {
        if let Ok(socket) = DatagramIpv4Socket::new() {
            let _ = socket.send_to(&[], &address.with_port(9));
        }
    }
});
