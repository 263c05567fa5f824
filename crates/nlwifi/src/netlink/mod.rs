//! Synchronous Generic Netlink client for nl80211.
//!
//! The layers, leaf first:
//!
//! - [`attr`]: TLV attribute encoding and decoding
//! - [`message`], [`MessageBuilder`], [`genl::message`]: netlink and GENL framing
//! - [`NetlinkSocket`] and [`Connection`]: request/response and dump exchanges
//!   with sequence correlation
//! - [`genl::GenlConnection`]: family resolution through the controller
//! - [`genl::nl80211::Nl80211Connection`]: wireless commands
//! - [`Card`]: interface name, phy and ifindex resolved together
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use nlwifi::netlink::{Card, SocketConfig, SocketMode};
//! use nlwifi::netlink::genl::nl80211::Nl80211Connection;
//!
//! # fn example() -> nlwifi::Result<()> {
//! let config = SocketConfig::new().mode(SocketMode::OneShot);
//! let mut nl = Nl80211Connection::with_config(config)?;
//!
//! for card in nl.cards()? {
//!     println!("{card}");
//! }
//!
//! let card = Card::by_phy(&mut nl, 0)?;
//! for bss in nl.scan_results(&card)? {
//!     println!("{} {:?}", bss.bssid, bss.ssid_lossy());
//! }
//! # Ok(())
//! # }
//! ```

pub mod attr;
mod builder;
mod card;
pub mod connection;
#[cfg(test)]
mod fixtures;
pub mod genl;
pub mod message;
mod socket;

pub use attr::{AttrIter, Attribute, NlAttr};
pub use builder::{MessageBuilder, NestToken};
pub use card::Card;
pub use connection::{Connection, SocketConfig, SocketMode};
pub use message::{MessageIter, NLMSG_HDRLEN, NlMsgHdr, NlMsgType};
pub use socket::{NetlinkSocket, Transport};
