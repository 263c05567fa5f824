//! Byte-level packing of `struct ifreq`.
//!
//! ```text
//! struct ifreq {
//!     char ifr_name[IFNAMSIZ];          // 16 bytes, NUL padded
//!     union {                           // largest member: struct ifmap
//!         struct sockaddr ifru_addr;    // address ioctls
//!         struct sockaddr ifru_hwaddr;  // hardware address ioctls
//!         short ifru_flags;             // flag ioctls
//!         ...
//!     } ifr_ifru;
//! };
//! ```
//!
//! Fields are written at fixed offsets into a byte buffer rather than
//! through a Rust mirror of the C union.

use std::mem::size_of;
use std::net::Ipv4Addr;

use crate::error::{Error, Result};
use crate::util::addr::{ETH_ALEN, MacAddr};
use crate::util::ifname::{self, IFNAMSIZ};

const LONG: usize = size_of::<libc::c_long>();

/// Size of the `ifr_ifru` union: `struct ifmap` (two longs, a short and
/// three chars) rounded up to the alignment of long.
pub const IFRU_SIZE: usize = (2 * LONG + 5).div_ceil(LONG) * LONG;

/// Size of `struct ifreq`.
pub const IFREQ_SIZE: usize = IFNAMSIZ + IFRU_SIZE;

/// `sa_family` of an IPv4 `sockaddr_in`.
pub const AF_INET: u16 = 2;

/// `sa_family` of an Ethernet hardware address.
pub const ARPHRD_ETHER: u16 = 1;

/// `sizeof(struct sockaddr)`.
const SOCKADDR_SIZE: usize = 16;

const FAMILY_OFFSET: usize = IFNAMSIZ;
const PORT_OFFSET: usize = IFNAMSIZ + 2;
const IPV4_OFFSET: usize = IFNAMSIZ + 4;
const HWADDR_OFFSET: usize = IFNAMSIZ + 2;
const FLAGS_OFFSET: usize = IFNAMSIZ;

/// An interface request buffer.
#[repr(C, align(8))]
#[derive(Clone, PartialEq, Eq)]
pub struct Ifreq {
    buf: [u8; IFREQ_SIZE],
}

impl Ifreq {
    /// Zeroed request for device `name`.
    pub fn new(name: &str) -> Result<Self> {
        ifname::validate(name)?;
        let mut buf = [0u8; IFREQ_SIZE];
        buf[..name.len()].copy_from_slice(name.as_bytes());
        Ok(Self { buf })
    }

    /// Device name.
    pub fn name(&self) -> String {
        let name = &self.buf[..IFNAMSIZ];
        let len = name.iter().position(|&c| c == 0).unwrap_or(IFNAMSIZ);
        String::from_utf8_lossy(&name[..len]).into_owned()
    }

    fn clear_union(&mut self) {
        self.buf[IFNAMSIZ..].fill(0);
    }

    fn family(&self) -> u16 {
        u16::from_ne_bytes([self.buf[FAMILY_OFFSET], self.buf[FAMILY_OFFSET + 1]])
    }

    fn set_family(&mut self, family: u16) {
        self.buf[FAMILY_OFFSET..FAMILY_OFFSET + 2].copy_from_slice(&family.to_ne_bytes());
    }

    /// Store an IPv4 address as `struct sockaddr_in` with port 0.
    pub fn set_ipv4(&mut self, addr: Ipv4Addr) {
        self.clear_union();
        self.set_family(AF_INET);
        self.buf[PORT_OFFSET..PORT_OFFSET + 2].copy_from_slice(&0u16.to_be_bytes());
        self.buf[IPV4_OFFSET..IPV4_OFFSET + 4].copy_from_slice(&addr.octets());
    }

    /// Read back a `struct sockaddr_in`.
    pub fn ipv4(&self) -> Result<Ipv4Addr> {
        let family = self.family();
        if family != AF_INET {
            return Err(Error::InvalidMessage(format!(
                "expected AF_INET address, got family {family}"
            )));
        }
        let octets: [u8; 4] = self.buf[IPV4_OFFSET..IPV4_OFFSET + 4]
            .try_into()
            .map_err(|_| Error::Truncated {
                expected: 4,
                actual: 0,
            })?;
        Ok(Ipv4Addr::from(octets))
    }

    /// Store an Ethernet hardware address as `struct sockaddr`.
    pub fn set_hw_addr(&mut self, mac: MacAddr) {
        self.clear_union();
        self.set_family(ARPHRD_ETHER);
        self.buf[HWADDR_OFFSET..HWADDR_OFFSET + ETH_ALEN].copy_from_slice(&mac.octets());
    }

    /// Read back a hardware address.
    pub fn hw_addr(&self) -> Result<MacAddr> {
        MacAddr::from_slice(&self.buf[HWADDR_OFFSET..HWADDR_OFFSET + ETH_ALEN])
    }

    /// Hardware address family (`ARPHRD_*`) written by the kernel.
    pub fn hw_family(&self) -> u16 {
        self.family()
    }

    /// Store interface flags.
    pub fn set_flags(&mut self, flags: i16) {
        self.clear_union();
        self.buf[FLAGS_OFFSET..FLAGS_OFFSET + 2].copy_from_slice(&flags.to_ne_bytes());
    }

    /// Interface flags.
    pub fn flags(&self) -> i16 {
        i16::from_ne_bytes([self.buf[FLAGS_OFFSET], self.buf[FLAGS_OFFSET + 1]])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Pointer handed to `ioctl(2)`; the kernel reads and writes the whole
    /// buffer.
    pub(crate) fn as_mut_ptr(&mut self) -> *mut libc::c_void {
        self.buf.as_mut_ptr().cast()
    }
}

impl std::fmt::Debug for Ifreq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ifreq")
            .field("name", &self.name())
            .field("ifru", &&self.buf[IFNAMSIZ..IFNAMSIZ + SOCKADDR_SIZE])
            .finish()
    }
}
