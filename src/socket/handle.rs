use tracing::{debug, trace};

use crate::core::{AddressFamily, SocketType};
use crate::error::{Result, SocketError};
use crate::sys::{self, RawHandle};
use crate::utils::metrics::global_metrics;

use super::native_failure;

/// Exclusive owner of one live native handle.
///
/// Not `Clone`: the handle is released exactly once, when its owner drops.
/// A moved-from binding is inaccessible, so it cannot close anything.
#[derive(Debug)]
pub(crate) struct Handle {
    raw: RawHandle,
}

impl Handle {
    /// Open a fresh native handle of the given family and type.
    pub(crate) fn open(family: AddressFamily, socket_type: SocketType) -> Result<Self> {
        sys::ensure_initialized();

        let raw = sys::open(family, socket_type).map_err(native_failure(SocketError::Construction))?;
        global_metrics().handle_opened();
        debug!(handle = raw, ?family, ?socket_type, "Socket opened");

        Ok(Self { raw })
    }

    /// Take ownership of a handle produced by the native API elsewhere.
    pub(crate) fn from_raw(raw: RawHandle) -> Self {
        Self { raw }
    }

    #[inline]
    pub(crate) fn raw(&self) -> RawHandle {
        self.raw
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        // Best effort: a failed close leaves nothing for the caller to do
        match sys::close(self.raw) {
            Ok(()) => trace!(handle = self.raw, "Socket closed"),
            Err(e) => debug!(handle = self.raw, error = %e, "Socket close failed"),
        }
        global_metrics().handle_closed();
    }
}
