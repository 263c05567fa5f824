//! Identity of a wireless card.
//!
//! nl80211 and the ioctl layer key their requests on different identifiers:
//! some take the interface index, some the phy index, ioctls the device
//! name. A [`Card`] carries all three, resolved together.

use std::fmt;
use std::hash::{Hash, Hasher};

use super::genl::nl80211::{Interface, Nl80211Connection};
use super::socket::Transport;
use crate::error::{Error, Result};

/// A wireless network interface with its phy and interface index.
///
/// Cards are snapshots: a renamed or removed device is only noticed by the
/// next operation that fails. Two cards are equal when their interface
/// indexes are, since the index survives renames.
#[derive(Debug, Clone)]
pub struct Card {
    dev: String,
    phy: u32,
    ifindex: u32,
}

impl Card {
    /// Build a card from already known identifiers.
    pub fn new(dev: impl Into<String>, phy: u32, ifindex: u32) -> Self {
        Self {
            dev: dev.into(),
            phy,
            ifindex,
        }
    }

    /// Resolve a card by device name.
    pub fn by_name<T: Transport>(nl: &mut Nl80211Connection<T>, dev: &str) -> Result<Self> {
        nl.interfaces()?
            .iter()
            .find(|iface| iface.name == dev)
            .map(Self::from)
            .ok_or_else(|| Error::InterfaceNotFound {
                name: dev.to_string(),
            })
    }

    /// Resolve a card by interface index.
    pub fn by_ifindex<T: Transport>(nl: &mut Nl80211Connection<T>, ifindex: u32) -> Result<Self> {
        nl.interface(ifindex).map(|iface| Self::from(&iface))
    }

    /// Resolve a card on the given phy.
    ///
    /// A phy can host several interfaces; the one with the lowest ifindex
    /// (normally the first one created) is returned.
    pub fn by_phy<T: Transport>(nl: &mut Nl80211Connection<T>, phy: u32) -> Result<Self> {
        nl.interfaces()?
            .iter()
            .filter(|iface| iface.phy == phy)
            .min_by_key(|iface| iface.ifindex)
            .map(Self::from)
            .ok_or(Error::PhyNotFound { phy })
    }

    /// Device name.
    pub fn dev(&self) -> &str {
        &self.dev
    }

    /// Phy index.
    pub fn phy(&self) -> u32 {
        self.phy
    }

    /// Interface index.
    pub fn ifindex(&self) -> u32 {
        self.ifindex
    }
}

impl From<&Interface> for Card {
    fn from(iface: &Interface) -> Self {
        Self::new(iface.name.clone(), iface.phy, iface.ifindex)
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.ifindex == other.ifindex
    }
}

impl Eq for Card {}

impl Hash for Card {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ifindex.hash(state);
    }
}

impl AsRef<str> for Card {
    fn as_ref(&self) -> &str {
        &self.dev
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (phy{}, ifindex {})", self.dev, self.phy, self.ifindex)
    }
}
