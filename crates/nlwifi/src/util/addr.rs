//! Hardware address parsing and formatting.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Length of an Ethernet/802.11 hardware address.
pub const ETH_ALEN: usize = 6;

/// A 48-bit hardware address.
///
/// Parses from and displays as `aa:bb:cc:dd:ee:ff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct MacAddr(pub [u8; ETH_ALEN]);

impl MacAddr {
    /// The all-zero address.
    pub const ZERO: MacAddr = MacAddr([0; ETH_ALEN]);

    /// Build from the first six bytes of a kernel payload.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let octets: [u8; ETH_ALEN] = bytes
            .get(..ETH_ALEN)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| {
                Error::InvalidAttribute(format!("hardware address of {} bytes", bytes.len()))
            })?;
        Ok(Self(octets))
    }

    /// The raw octets.
    pub fn octets(&self) -> [u8; ETH_ALEN] {
        self.0
    }

    /// Check the group bit of the first octet.
    pub fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 != 0
    }

    /// Check the locally-administered bit of the first octet.
    pub fn is_local(&self) -> bool {
        self.0[0] & 0x02 != 0
    }
}

impl From<[u8; ETH_ALEN]> for MacAddr {
    fn from(octets: [u8; ETH_ALEN]) -> Self {
        Self(octets)
    }
}

impl FromStr for MacAddr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidArgument(format!("invalid MAC address: {s}"));

        let mut mac = [0u8; ETH_ALEN];
        let mut parts = s.split(':');
        for octet in mac.iter_mut() {
            let part = parts.next().ok_or_else(invalid)?;
            if part.is_empty() || part.len() > 2 {
                return Err(invalid());
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self(mac))
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}
