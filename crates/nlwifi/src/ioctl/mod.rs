//! Interface configuration through `ioctl(2)`.
//!
//! Covers what nl80211 does not: hardware address, IPv4 address, netmask
//! and broadcast, and the up/down flag. Every call packs an [`Ifreq`] and
//! issues one ioctl on a datagram socket.
//!
//! These calls are not ordered with respect to nl80211 requests; callers
//! that mix both must serialize them.
//!
//! # Example
//!
//! ```rust,no_run
//! use nlwifi::ioctl::IoctlSocket;
//! use nlwifi::util::MacAddr;
//!
//! # fn example() -> nlwifi::Result<()> {
//! let sock = IoctlSocket::new()?;
//! let mac: MacAddr = "02:00:00:aa:bb:cc".parse()?;
//!
//! sock.set_up("wlan0", false)?;
//! sock.set_hw_addr("wlan0", mac)?;
//! sock.set_up("wlan0", true)?;
//! # Ok(())
//! # }
//! ```

mod ifreq;

use std::io;
use std::net::Ipv4Addr;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};

pub use ifreq::{ARPHRD_ETHER, IFREQ_SIZE, IFRU_SIZE, Ifreq};

use crate::error::{Error, Result};
use crate::util::MacAddr;
use crate::util::ifname;

const SIOCGIFFLAGS: libc::c_ulong = 0x8913;
const SIOCSIFFLAGS: libc::c_ulong = 0x8914;
const SIOCGIFADDR: libc::c_ulong = 0x8915;
const SIOCSIFADDR: libc::c_ulong = 0x8916;
const SIOCGIFBRDADDR: libc::c_ulong = 0x8919;
const SIOCSIFBRDADDR: libc::c_ulong = 0x891a;
const SIOCGIFNETMASK: libc::c_ulong = 0x891b;
const SIOCSIFNETMASK: libc::c_ulong = 0x891c;
const SIOCSIFHWADDR: libc::c_ulong = 0x8924;
const SIOCGIFHWADDR: libc::c_ulong = 0x8927;

/// `IFF_UP` in `ifr_flags`.
pub const IFF_UP: i16 = 0x1;

/// IPv4 configuration of an interface.
///
/// Fields the interface has no value for are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ipv4Config {
    pub address: Option<Ipv4Addr>,
    pub netmask: Option<Ipv4Addr>,
    pub broadcast: Option<Ipv4Addr>,
}

impl Ipv4Config {
    /// Address with the given netmask and no explicit broadcast.
    pub fn new(address: Ipv4Addr, netmask: Ipv4Addr) -> Self {
        Self {
            address: Some(address),
            netmask: Some(netmask),
            broadcast: None,
        }
    }

    pub fn with_broadcast(mut self, broadcast: Ipv4Addr) -> Self {
        self.broadcast = Some(broadcast);
        self
    }

    /// Prefix length of the netmask, if it is contiguous.
    pub fn prefix_len(&self) -> Option<u8> {
        let mask = self.netmask?.to_bits();
        let ones = mask.leading_ones();
        (mask.checked_shl(ones).unwrap_or(0) == 0).then_some(ones as u8)
    }
}

/// Socket used to issue interface ioctls.
#[derive(Debug)]
pub struct IoctlSocket {
    fd: OwnedFd,
}

impl IoctlSocket {
    /// Open an `AF_INET` datagram socket.
    pub fn new() -> Result<Self> {
        // SAFETY: socket(2) takes no pointers; the result is checked below.
        let fd = unsafe { libc::socket(libc::AF_INET, libc::SOCK_DGRAM | libc::SOCK_CLOEXEC, 0) };
        if fd < 0 {
            return Err(Error::from_io(io::Error::last_os_error(), "open ioctl socket"));
        }
        // SAFETY: fd is a freshly created descriptor owned by nothing else.
        Ok(Self {
            fd: unsafe { OwnedFd::from_raw_fd(fd) },
        })
    }

    /// Issue `request` for `ifr`, which the kernel may rewrite in place.
    fn call(&self, request: libc::c_ulong, op: &str, ifr: &mut Ifreq) -> Result<()> {
        tracing::trace!(dev = %ifr.name(), op, "ioctl");
        // SAFETY: ifr is a full-size, writable struct ifreq buffer.
        let ret = unsafe { libc::ioctl(self.fd.as_raw_fd(), request as _, ifr.as_mut_ptr()) };
        if ret < 0 {
            return Err(ioctl_error(io::Error::last_os_error(), op, &ifr.name()));
        }
        Ok(())
    }

    /// Request for `dev` after checking the device exists.
    fn request(dev: &str) -> Result<Ifreq> {
        ifname::require(dev)?;
        Ifreq::new(dev)
    }

    /// Hardware address of `dev`.
    pub fn hw_addr(&self, dev: impl AsRef<str>) -> Result<MacAddr> {
        let mut ifr = Self::request(dev.as_ref())?;
        self.call(SIOCGIFHWADDR, "get hardware address", &mut ifr)?;
        ifr.hw_addr()
    }

    /// Change the hardware address of `dev`.
    ///
    /// Most drivers only accept this while the interface is down.
    pub fn set_hw_addr(&self, dev: impl AsRef<str>, mac: MacAddr) -> Result<()> {
        let mut ifr = Self::request(dev.as_ref())?;
        ifr.set_hw_addr(mac);
        tracing::debug!(dev = dev.as_ref(), %mac, "set hardware address");
        self.call(SIOCSIFHWADDR, "set hardware address", &mut ifr)
    }

    fn get_ipv4(&self, dev: &str, request: libc::c_ulong, op: &str) -> Result<Option<Ipv4Addr>> {
        let mut ifr = Self::request(dev)?;
        match self.call(request, op, &mut ifr) {
            Ok(()) => ifr.ipv4().map(Some),
            Err(e) if e.errno() == Some(libc::EADDRNOTAVAIL) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set_ipv4_field(
        &self,
        dev: &str,
        request: libc::c_ulong,
        op: &str,
        addr: Ipv4Addr,
    ) -> Result<()> {
        let mut ifr = Self::request(dev)?;
        ifr.set_ipv4(addr);
        self.call(request, op, &mut ifr)
    }

    /// IPv4 address, netmask and broadcast of `dev`.
    pub fn ipv4(&self, dev: impl AsRef<str>) -> Result<Ipv4Config> {
        let dev = dev.as_ref();
        Ok(Ipv4Config {
            address: self.get_ipv4(dev, SIOCGIFADDR, "get address")?,
            netmask: self.get_ipv4(dev, SIOCGIFNETMASK, "get netmask")?,
            broadcast: self.get_ipv4(dev, SIOCGIFBRDADDR, "get broadcast address")?,
        })
    }

    /// Apply the fields of `config` that are set.
    ///
    /// The address goes first since setting it resets the netmask and
    /// broadcast to their classful defaults.
    pub fn set_ipv4(&self, dev: impl AsRef<str>, config: &Ipv4Config) -> Result<()> {
        let dev = dev.as_ref();
        tracing::debug!(dev, ?config, "set IPv4 configuration");
        if let Some(address) = config.address {
            self.set_ipv4_field(dev, SIOCSIFADDR, "set address", address)?;
        }
        if let Some(netmask) = config.netmask {
            self.set_ipv4_field(dev, SIOCSIFNETMASK, "set netmask", netmask)?;
        }
        if let Some(broadcast) = config.broadcast {
            self.set_ipv4_field(dev, SIOCSIFBRDADDR, "set broadcast address", broadcast)?;
        }
        Ok(())
    }

    /// Interface flags (`IFF_*`).
    pub fn flags(&self, dev: impl AsRef<str>) -> Result<i16> {
        let mut ifr = Self::request(dev.as_ref())?;
        self.call(SIOCGIFFLAGS, "get flags", &mut ifr)?;
        Ok(ifr.flags())
    }

    /// Whether `dev` is administratively up.
    pub fn is_up(&self, dev: impl AsRef<str>) -> Result<bool> {
        Ok(self.flags(dev)? & IFF_UP != 0)
    }

    /// Bring `dev` up or down, leaving the other flags as they are.
    pub fn set_up(&self, dev: impl AsRef<str>, up: bool) -> Result<()> {
        let dev = dev.as_ref();
        let mut ifr = Self::request(dev)?;
        self.call(SIOCGIFFLAGS, "get flags", &mut ifr)?;

        let flags = ifr.flags();
        let wanted = if up { flags | IFF_UP } else { flags & !IFF_UP };
        if wanted == flags {
            return Ok(());
        }

        tracing::debug!(dev, up, "set link state");
        ifr.set_flags(wanted);
        self.call(SIOCSIFFLAGS, "set flags", &mut ifr)
    }
}

impl AsRawFd for IoctlSocket {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

fn ioctl_error(err: io::Error, op: &str, dev: &str) -> Error {
    match err.raw_os_error() {
        Some(libc::ENODEV) | Some(libc::ENXIO) => Error::InterfaceNotFound {
            name: dev.to_string(),
        },
        Some(libc::EPERM) | Some(libc::EACCES) => Error::PermissionDenied {
            operation: format!("{op} on {dev}"),
        },
        Some(errno) => Error::from_errno_with_context(-errno, format!("{op} on {dev}")),
        None => Error::Io(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_device_fails_before_ioctl() {
        let sock = IoctlSocket::new().unwrap();
        let mac: MacAddr = "02:00:00:00:00:01".parse().unwrap();

        let err = sock.set_hw_addr("nlwifi-none0", mac).unwrap_err();
        assert!(matches!(err, Error::InterfaceNotFound { ref name } if name == "nlwifi-none0"));
        assert!(err.is_not_found());
        assert!(sock.hw_addr("nlwifi-none0").unwrap_err().is_not_found());
        assert!(sock.set_up("nlwifi-none0", true).unwrap_err().is_not_found());
    }

    #[test]
    fn test_invalid_name() {
        let sock = IoctlSocket::new().unwrap();
        assert!(matches!(
            sock.flags("bad/name"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_loopback_flags() {
        let sock = IoctlSocket::new().unwrap();
        let flags = sock.flags("lo").unwrap();
        assert_ne!(flags as libc::c_int & libc::IFF_LOOPBACK, 0);
    }

    #[test]
    fn test_error_mapping() {
        let err = ioctl_error(io::Error::from_raw_os_error(libc::EPERM), "set flags", "wlan0");
        assert!(err.is_permission_denied());
        assert!(err.to_string().contains("set flags on wlan0"));

        let err = ioctl_error(io::Error::from_raw_os_error(libc::ENODEV), "get flags", "wlan0");
        assert!(matches!(err, Error::InterfaceNotFound { .. }));

        let err = ioctl_error(io::Error::from_raw_os_error(libc::EBUSY), "set hardware address", "wlan0");
        assert!(err.is_busy());
        assert_eq!(err.code(), libc::EBUSY);
    }

    #[test]
    fn test_prefix_len() {
        let cfg = Ipv4Config::new(Ipv4Addr::new(10, 0, 0, 2), Ipv4Addr::new(255, 255, 255, 0));
        assert_eq!(cfg.prefix_len(), Some(24));
        let cfg = Ipv4Config::new(Ipv4Addr::new(10, 0, 0, 2), Ipv4Addr::new(255, 0, 255, 0));
        assert_eq!(cfg.prefix_len(), None);
        assert_eq!(Ipv4Config::default().prefix_len(), None);
        let cfg = Ipv4Config::new(Ipv4Addr::new(10, 0, 0, 2), Ipv4Addr::BROADCAST);
        assert_eq!(cfg.prefix_len(), Some(32));
    }
}
