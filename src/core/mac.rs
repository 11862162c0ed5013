//! # MAC Address Parsing
//!
//! Strict parser for textual hardware addresses.
//!
//! Exactly two shapes are accepted:
//! - **raw**: 12 contiguous hex characters, e.g. `0a1b2c3d4e5f`
//! - **separated**: 17 characters `XX?XX?XX?XX?XX?XX` where `?` is `:` or `-`
//!   and the same separator is used at every position
//!
//! Hex digits are case-insensitive. Byte `i` of the result is the `i`-th pair
//! in left-to-right textual order.
//!
//! ```rust
//! use socket_core::parse_mac;
//!
//! let mac = parse_mac("00-1A-2b-3C-4d-5E").unwrap();
//! assert_eq!(mac.octets(), [0x00, 0x1a, 0x2b, 0x3c, 0x4d, 0x5e]);
//! assert_eq!(mac.to_string(), "00:1a:2b:3c:4d:5e");
//! ```

use crate::error::{Result, SocketError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const RAW_MAC_LEN: usize = 12;
const SEP_MAC_LEN: usize = 17;
const SEP_POSITION: usize = 2;

/// A 6-byte hardware address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct MacAddress([u8; MacAddress::BYTE_SIZE]);

impl MacAddress {
    pub const BYTE_SIZE: usize = 6;

    pub const fn new(bytes: [u8; Self::BYTE_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; Self::BYTE_SIZE] {
        &self.0
    }

    pub fn octets(&self) -> [u8; Self::BYTE_SIZE] {
        self.0
    }
}

impl From<[u8; MacAddress::BYTE_SIZE]> for MacAddress {
    fn from(bytes: [u8; MacAddress::BYTE_SIZE]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl FromStr for MacAddress {
    type Err = SocketError;

    fn from_str(s: &str) -> Result<Self> {
        parse_mac(s)
    }
}

impl Serialize for MacAddress {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MacAddress {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        parse_mac(&text).map_err(serde::de::Error::custom)
    }
}

/// Parse a MAC address in raw or separated form.
///
/// # Errors
/// - [`SocketError::InvalidMacLength`] when the length is neither 12 nor 17
/// - [`SocketError::InvalidMacSeparator`] when a 17-character input does not
///   use `:` or `-` at position 2
/// - [`SocketError::InvalidMacFormat`] when a later separator differs from
///   the one at position 2
/// - [`SocketError::InvalidHexDigit`] when a byte position holds a non-hex
///   character
pub fn parse_mac(mac: &str) -> Result<MacAddress> {
    let text = mac.as_bytes();

    let step = match text.len() {
        RAW_MAC_LEN => 2,
        SEP_MAC_LEN => 3,
        other => return Err(SocketError::InvalidMacLength(other)),
    };

    let separator = (step == 3).then(|| text[SEP_POSITION]);
    if let Some(sep) = separator {
        if !is_separator(sep) {
            return Err(SocketError::InvalidMacSeparator(char_at(mac, SEP_POSITION)));
        }
    }

    let mut bytes = [0u8; MacAddress::BYTE_SIZE];
    for (idx, byte) in bytes.iter_mut().enumerate() {
        let pos = idx * step;

        if let Some(sep) = separator {
            if pos > 0 && text[pos - 1] != sep {
                return Err(SocketError::InvalidMacFormat { position: pos - 1 });
            }
        }

        let high = hex_value(mac, pos)?;
        let low = hex_value(mac, pos + 1)?;
        *byte = (high << 4) | low;
    }

    Ok(MacAddress(bytes))
}

#[inline]
fn is_separator(byte: u8) -> bool {
    byte == b':' || byte == b'-'
}

#[inline]
fn hex_value(mac: &str, position: usize) -> Result<u8> {
    let byte = mac.as_bytes()[position];
    match byte {
        b'0'..=b'9' => Ok(byte - b'0'),
        b'a'..=b'f' => Ok(byte - b'a' + 10),
        b'A'..=b'F' => Ok(byte - b'A' + 10),
        _ => Err(SocketError::InvalidHexDigit {
            position,
            found: char_at(mac, position),
        }),
    }
}

// Character covering byte offset `position` (non-ASCII input spans several bytes)
fn char_at(text: &str, position: usize) -> char {
    text.char_indices()
        .take_while(|(idx, _)| *idx <= position)
        .last()
        .map(|(_, c)| c)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}
