#![no_main]

use libfuzzer_sys::fuzz_target;
use socket_core::parse_mac;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        // Any accepted input must print back to something that parses identically.
        if let Ok(mac) = parse_mac(text) {
            assert_eq!(parse_mac(&mac.to_string()), Ok(mac));
        }
    }
});
