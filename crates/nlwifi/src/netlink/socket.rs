//! Low-level blocking netlink socket operations.

use std::io;
use std::os::unix::io::{AsRawFd, RawFd};
use std::time::Duration;

use netlink_sys::{Socket, SocketAddr, protocols};

use crate::error::{Error, Result};

/// A datagram endpoint speaking netlink.
///
/// [`Connection`](super::Connection) drives request/reply correlation over any
/// transport; [`NetlinkSocket`] is the kernel-backed one.
pub trait Transport {
    /// Local port ID stamped into outgoing headers.
    fn pid(&self) -> u32;

    /// Send one datagram.
    fn send(&mut self, msg: &[u8]) -> Result<()>;

    /// Receive one datagram, blocking until data arrives or the receive
    /// window expires ([`Error::Timeout`]).
    fn recv(&mut self) -> Result<Vec<u8>>;
}

/// Blocking `NETLINK_GENERIC` socket.
///
/// The descriptor is closed when the socket is dropped.
pub struct NetlinkSocket {
    socket: Socket,
    /// Local port ID (assigned by kernel).
    pid: u32,
    /// Largest datagram accepted by [`recv`](Transport::recv).
    max_reply_size: usize,
}

impl NetlinkSocket {
    /// Open and bind a generic netlink socket.
    pub fn new() -> Result<Self> {
        let mut socket = Socket::new(protocols::NETLINK_GENERIC)
            .map_err(|e| Error::from_io(e, "open netlink socket"))?;

        // Bind to get a port ID
        let mut addr = SocketAddr::new(0, 0);
        socket.bind(&addr)?;
        socket.get_address(&mut addr)?;
        let pid = addr.port_number();

        tracing::trace!(pid, "netlink socket bound");

        Ok(Self {
            socket,
            pid,
            max_reply_size: 32768,
        })
    }

    /// Enable extended ACK reporting. Ignored by kernels that lack it.
    pub fn set_ext_ack(&mut self, enable: bool) {
        if let Err(e) = self.socket.set_ext_ack(enable) {
            tracing::debug!("extended ack unavailable: {}", e);
        }
    }

    /// Set the receive window. `None` blocks forever.
    pub fn set_recv_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        let timeout = timeout.unwrap_or(Duration::ZERO);
        let tv = libc::timeval {
            tv_sec: timeout.as_secs() as libc::time_t,
            tv_usec: timeout.subsec_micros() as libc::suseconds_t,
        };
        // SAFETY: tv is a valid timeval and the length matches its size.
        let ret = unsafe {
            libc::setsockopt(
                self.as_raw_fd(),
                libc::SOL_SOCKET,
                libc::SO_RCVTIMEO,
                &tv as *const libc::timeval as *const libc::c_void,
                std::mem::size_of::<libc::timeval>() as libc::socklen_t,
            )
        };
        if ret < 0 {
            return Err(Error::Io(io::Error::last_os_error()));
        }
        Ok(())
    }

    /// Set the largest datagram accepted from the kernel.
    pub fn set_max_reply_size(&mut self, size: usize) {
        self.max_reply_size = size;
    }
}

impl Transport for NetlinkSocket {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn send(&mut self, msg: &[u8]) -> Result<()> {
        self.socket
            .send(msg, 0)
            .map_err(|e| Error::from_io(e, "netlink send"))?;
        Ok(())
    }

    fn recv(&mut self) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; self.max_reply_size];
        // MSG_TRUNC makes the kernel report the full datagram length even
        // when it did not fit.
        // SAFETY: buf is valid for writes of buf.len() bytes.
        let n = unsafe {
            libc::recv(
                self.as_raw_fd(),
                buf.as_mut_ptr() as *mut libc::c_void,
                buf.len(),
                libc::MSG_TRUNC,
            )
        };
        if n < 0 {
            return Err(Error::from_io(io::Error::last_os_error(), "netlink reply"));
        }

        let n = received_len(n as usize, buf.len())?;
        buf.truncate(n);
        tracing::trace!(bytes = n, "netlink datagram received");
        Ok(buf)
    }
}

/// Check the length reported by a `MSG_TRUNC` receive against the buffer.
///
/// The kernel reports the full datagram length, so anything above
/// `capacity` was cut short.
fn received_len(reported: usize, capacity: usize) -> Result<usize> {
    if reported > capacity {
        return Err(Error::ReplyTooLarge {
            size: reported,
            limit: capacity,
        });
    }
    Ok(reported)
}

impl AsRawFd for NetlinkSocket {
    fn as_raw_fd(&self) -> RawFd {
        self.socket.as_raw_fd()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_received_len_within_buffer() {
        assert_eq!(received_len(0, 64).unwrap(), 0);
        assert_eq!(received_len(64, 64).unwrap(), 64);
    }

    #[test]
    fn test_truncated_datagram_is_an_error() {
        let err = received_len(4096, 64).unwrap_err();
        assert!(matches!(
            err,
            Error::ReplyTooLarge {
                size: 4096,
                limit: 64
            }
        ));
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}
