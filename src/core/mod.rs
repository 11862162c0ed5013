//! # Core Types
//!
//! The portable vocabulary shared by every socket role, plus the MAC address
//! parser.
//!
//! ## Components
//! - **Types**: address family, socket type, option level/name, `Address`
//! - **MAC**: `MacAddress` and the strict `parse_mac` parser
//!
//! Nothing in this module touches the native socket API. Conversion to and
//! from native constants and structures happens only in the crate's platform
//! layer.

pub mod mac;
pub mod types;

pub use mac::{parse_mac, MacAddress};
pub use types::{Address, AddressFamily, OptionLevel, OptionName, SocketType};
