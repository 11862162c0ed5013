//! BSD socket backend (via `libc`).
//!
//! Forward mappings (portable → native) are exhaustive matches, so an
//! unknown enumerator cannot reach the native API. Reverse mappings must
//! only ever see values this module produced; anything else is a logic
//! fault and panics.

use std::ffi::CString;
use std::mem;
use std::net::Ipv4Addr;
use std::os::unix::io::RawFd;

use libc::{c_char, c_int, c_void, sockaddr, sockaddr_in, sockaddr_storage, socklen_t};

use crate::core::{Address, AddressFamily, OptionLevel, OptionName, SocketType};
use crate::error::{constants, NativeError, SocketError};

/// Native socket handle
pub(crate) type RawHandle = RawFd;

type NativeResult<T> = std::result::Result<T, NativeError>;

#[cfg(any(target_os = "linux", target_os = "android"))]
const SOCK_FLAGS: c_int = libc::SOCK_CLOEXEC;
#[cfg(not(any(target_os = "linux", target_os = "android")))]
const SOCK_FLAGS: c_int = 0;

// A peer closing its end must surface as an `EPIPE` send failure rather than
// a signal. Where the flag exists it is passed per call.
#[cfg(any(target_os = "linux", target_os = "android"))]
const SEND_FLAGS: c_int = libc::MSG_NOSIGNAL;
#[cfg(not(any(target_os = "linux", target_os = "android")))]
const SEND_FLAGS: c_int = 0;

extern "C" {
    fn inet_pton(af: c_int, src: *const c_char, dst: *mut c_void) -> c_int;
}

/// Process-wide startup. Only needed where sends cannot opt out of
/// `SIGPIPE` per call.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub(crate) fn startup() {}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub(crate) fn startup() {
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_IGN);
    }
}

// ============================================================================
// Enumeration mappings
// ============================================================================

pub(crate) fn family_to_native(family: AddressFamily) -> c_int {
    match family {
        AddressFamily::Ipv4 => libc::AF_INET,
    }
}

pub(crate) fn family_from_native(family: c_int) -> AddressFamily {
    match family {
        libc::AF_INET => AddressFamily::Ipv4,
        other => unreachable!("native address family {other} has no portable equivalent"),
    }
}

pub(crate) fn type_to_native(ty: SocketType) -> c_int {
    match ty {
        SocketType::Stream => libc::SOCK_STREAM,
        SocketType::Datagram => libc::SOCK_DGRAM,
    }
}

pub(crate) fn type_from_native(ty: c_int) -> SocketType {
    match ty {
        libc::SOCK_STREAM => SocketType::Stream,
        libc::SOCK_DGRAM => SocketType::Datagram,
        other => unreachable!("native socket type {other} has no portable equivalent"),
    }
}

pub(crate) fn level_to_native(level: OptionLevel) -> c_int {
    match level {
        OptionLevel::Socket => libc::SOL_SOCKET,
    }
}

pub(crate) fn name_to_native(name: OptionName) -> c_int {
    match name {
        OptionName::Broadcast => libc::SO_BROADCAST,
        OptionName::ReuseAddress => libc::SO_REUSEADDR,
        OptionName::KeepAlive => libc::SO_KEEPALIVE,
    }
}

// ============================================================================
// Address conversion
// ============================================================================

/// Build a native IPv4 socket address. The IP text is parsed by `inet_pton`.
pub(crate) fn address_to_native(address: &Address) -> crate::error::Result<sockaddr_in> {
    let family = family_to_native(address.family);
    let ip = CString::new(address.ip.as_str())
        .map_err(|_| SocketError::InvalidAddress(address.ip.clone()))?;

    let mut native: sockaddr_in = unsafe { mem::zeroed() };
    native.sin_family = family as libc::sa_family_t;
    native.sin_port = address.port.to_be();
    #[cfg(any(
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "openbsd",
        target_os = "netbsd",
        target_os = "dragonfly"
    ))]
    {
        native.sin_len = mem::size_of::<sockaddr_in>() as u8;
    }

    let rc = unsafe {
        inet_pton(
            family,
            ip.as_ptr(),
            &mut native.sin_addr as *mut libc::in_addr as *mut c_void,
        )
    };
    if rc != 1 {
        return Err(SocketError::InvalidAddress(address.ip.clone()));
    }

    Ok(native)
}

pub(crate) fn address_from_native(native: &sockaddr_in) -> Address {
    let family = family_from_native(c_int::from(native.sin_family));
    let ip = Ipv4Addr::from(u32::from_be(native.sin_addr.s_addr));
    Address::new(family, ip.to_string(), u16::from_be(native.sin_port))
}

fn storage_to_inet(storage: &sockaddr_storage) -> sockaddr_in {
    match family_from_native(c_int::from(storage.ss_family)) {
        // sockaddr_storage is large enough and aligned for every sockaddr_*
        AddressFamily::Ipv4 => unsafe { *(storage as *const sockaddr_storage as *const sockaddr_in) },
    }
}

// ============================================================================
// Native calls
// ============================================================================

#[inline]
fn cvt(rc: c_int) -> NativeResult<c_int> {
    if rc == -1 {
        Err(NativeError::last())
    } else {
        Ok(rc)
    }
}

#[inline]
fn cvt_len(rc: libc::ssize_t) -> NativeResult<usize> {
    if rc < 0 {
        Err(NativeError::last())
    } else {
        Ok(rc as usize)
    }
}

const SOCKADDR_IN_LEN: socklen_t = mem::size_of::<sockaddr_in>() as socklen_t;

pub(crate) fn open(family: AddressFamily, ty: SocketType) -> NativeResult<RawHandle> {
    cvt(unsafe { libc::socket(family_to_native(family), type_to_native(ty) | SOCK_FLAGS, 0) })
}

pub(crate) fn close(handle: RawHandle) -> NativeResult<()> {
    cvt(unsafe { libc::close(handle) }).map(drop)
}

pub(crate) fn bind(handle: RawHandle, address: &sockaddr_in) -> NativeResult<()> {
    let rc = unsafe {
        libc::bind(
            handle,
            address as *const sockaddr_in as *const sockaddr,
            SOCKADDR_IN_LEN,
        )
    };
    cvt(rc).map(drop)
}

pub(crate) fn connect(handle: RawHandle, address: &sockaddr_in) -> NativeResult<()> {
    let rc = unsafe {
        libc::connect(
            handle,
            address as *const sockaddr_in as *const sockaddr,
            SOCKADDR_IN_LEN,
        )
    };
    cvt(rc).map(drop)
}

pub(crate) fn listen(handle: RawHandle, backlog: i32) -> NativeResult<()> {
    cvt(unsafe { libc::listen(handle, backlog) }).map(drop)
}

#[cfg(any(target_os = "linux", target_os = "android"))]
pub(crate) fn accept(handle: RawHandle) -> NativeResult<RawHandle> {
    cvt(unsafe { libc::accept4(handle, std::ptr::null_mut(), std::ptr::null_mut(), SOCK_FLAGS) })
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub(crate) fn accept(handle: RawHandle) -> NativeResult<RawHandle> {
    cvt(unsafe { libc::accept(handle, std::ptr::null_mut(), std::ptr::null_mut()) })
}

pub(crate) fn send(handle: RawHandle, buffer: &[u8]) -> NativeResult<usize> {
    cvt_len(unsafe { libc::send(handle, buffer.as_ptr() as *const c_void, buffer.len(), SEND_FLAGS) })
}

pub(crate) fn recv(handle: RawHandle, buffer: &mut [u8]) -> NativeResult<usize> {
    cvt_len(unsafe { libc::recv(handle, buffer.as_mut_ptr() as *mut c_void, buffer.len(), 0) })
}

pub(crate) fn send_to(handle: RawHandle, buffer: &[u8], to: &sockaddr_in) -> NativeResult<usize> {
    let rc = unsafe {
        libc::sendto(
            handle,
            buffer.as_ptr() as *const c_void,
            buffer.len(),
            SEND_FLAGS,
            to as *const sockaddr_in as *const sockaddr,
            SOCKADDR_IN_LEN,
        )
    };
    cvt_len(rc)
}

pub(crate) fn recv_from(handle: RawHandle, buffer: &mut [u8]) -> NativeResult<(usize, sockaddr_in)> {
    let mut storage: sockaddr_storage = unsafe { mem::zeroed() };
    let mut len = mem::size_of::<sockaddr_storage>() as socklen_t;
    let rc = unsafe {
        libc::recvfrom(
            handle,
            buffer.as_mut_ptr() as *mut c_void,
            buffer.len(),
            0,
            &mut storage as *mut sockaddr_storage as *mut sockaddr,
            &mut len,
        )
    };
    let received = cvt_len(rc)?;
    Ok((received, storage_to_inet(&storage)))
}

/// `setsockopt` with the raw bytes of `value`.
pub(crate) fn set_option<T: Copy>(
    handle: RawHandle,
    level: OptionLevel,
    name: OptionName,
    value: &T,
) -> NativeResult<()> {
    let rc = unsafe {
        libc::setsockopt(
            handle,
            level_to_native(level),
            name_to_native(name),
            value as *const T as *const c_void,
            mem::size_of::<T>() as socklen_t,
        )
    };
    cvt(rc).map(drop)
}

/// Socket type of a handle, read back with `SO_TYPE`.
pub(crate) fn socket_type(handle: RawHandle) -> NativeResult<SocketType> {
    let mut ty: c_int = 0;
    let mut len = mem::size_of::<c_int>() as socklen_t;
    let rc = unsafe {
        libc::getsockopt(
            handle,
            libc::SOL_SOCKET,
            libc::SO_TYPE,
            &mut ty as *mut c_int as *mut c_void,
            &mut len,
        )
    };
    cvt(rc)?;
    Ok(type_from_native(ty))
}

pub(crate) fn local_name(handle: RawHandle) -> NativeResult<sockaddr_in> {
    let mut storage: sockaddr_storage = unsafe { mem::zeroed() };
    let mut len = mem::size_of::<sockaddr_storage>() as socklen_t;
    let rc = unsafe {
        libc::getsockname(
            handle,
            &mut storage as *mut sockaddr_storage as *mut sockaddr,
            &mut len,
        )
    };
    cvt(rc)?;
    Ok(storage_to_inet(&storage))
}

pub(crate) fn peer_name(handle: RawHandle) -> NativeResult<sockaddr_in> {
    let mut storage: sockaddr_storage = unsafe { mem::zeroed() };
    let mut len = mem::size_of::<sockaddr_storage>() as socklen_t;
    let rc = unsafe {
        libc::getpeername(
            handle,
            &mut storage as *mut sockaddr_storage as *mut sockaddr,
            &mut len,
        )
    };
    cvt(rc)?;
    Ok(storage_to_inet(&storage))
}

// ============================================================================
// Error rendering
// ============================================================================

/// Human-readable description of a native error code.
pub(crate) fn describe_error(code: i32) -> &'static str {
    match code {
        libc::EACCES => "Permission denied for the requested socket operation.",
        libc::EADDRINUSE => "The specified address is already in use.",
        libc::EADDRNOTAVAIL => "The specified address is not available on this host.",
        libc::EAFNOSUPPORT => "The specified address family is not supported.",
        libc::EAGAIN => "The operation would block on a non-blocking socket.",
        libc::EALREADY => "A connection attempt is already in progress.",
        libc::EBADF => "The handle is not a valid open descriptor.",
        libc::ECONNABORTED => "The connection was aborted by the local host.",
        libc::ECONNREFUSED => "The remote host refused the connection.",
        libc::ECONNRESET => "The connection was reset by the peer.",
        libc::EDESTADDRREQ => "A destination address is required.",
        libc::EHOSTUNREACH => "The remote host is unreachable.",
        libc::EINPROGRESS => "The operation is in progress.",
        libc::EINTR => "The call was interrupted by a signal.",
        libc::EINVAL => "Invalid argument supplied.",
        libc::EISCONN => "The socket is already connected.",
        libc::EMFILE => "The per-process descriptor table is full.",
        libc::EMSGSIZE => "The message is too large to be sent atomically.",
        libc::ENETDOWN => "The network subsystem has failed.",
        libc::ENETUNREACH => "The network is unreachable.",
        libc::ENFILE => "The system-wide descriptor table is full.",
        libc::ENOBUFS => "No buffer space is available.",
        libc::ENOPROTOOPT => "The option is unknown at the given level.",
        libc::ENOTCONN => "The socket is not connected.",
        libc::ENOTSOCK => "The handle does not refer to a socket.",
        libc::EOPNOTSUPP => "The operation is not supported on this socket.",
        libc::EPIPE => "The connection was closed by the peer.",
        libc::EPROTONOSUPPORT => "The protocol is not supported.",
        libc::EPROTOTYPE => "The protocol is the wrong type for this socket.",
        libc::ETIMEDOUT => "The connection attempt timed out.",
        _ => constants::ERR_NO_DESCRIPTION,
    }
}
