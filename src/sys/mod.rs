//! # Platform Layer
//!
//! The only place the crate talks to the native socket API. Everything here
//! is crate-private: portable values go in, native constants and structures
//! are built and consumed, and native failures come back out as
//! [`NativeError`](crate::error::NativeError).
//!
//! The network subsystem is initialized at most once per process, on first
//! use, and never torn down.

use std::sync::Once;
use tracing::debug;

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub(crate) use unix::*;

#[cfg(not(unix))]
compile_error!("socket-core only provides a native backend for unix targets");

static INIT: Once = Once::new();

/// Run the platform's one-time network startup. Safe to call from any number
/// of threads; only the first call does work.
pub(crate) fn ensure_initialized() {
    INIT.call_once(|| {
        startup();
        debug!("Native socket layer initialized");
    });
}
