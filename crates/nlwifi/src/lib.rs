//! Blocking control library for Linux wireless interfaces.
//!
//! Three kernel channels are covered:
//!
//! - [`netlink`] - generic netlink and the nl80211 family (interfaces,
//!   phys, channels, scanning, regulatory domain)
//! - [`ioctl`] - classic interface requests (hardware address, IPv4
//!   configuration, up/down flags)
//! - [`rfkill`] - the `/dev/rfkill` event device (soft blocks)
//!
//! # Features
//!
//! - `output` - JSON/text rendering of the domain records
//! - `integration` - live-kernel integration tests (need root)
//!
//! # Example
//!
//! ```rust,no_run
//! use nlwifi::netlink::Card;
//! use nlwifi::netlink::genl::nl80211::{InterfaceMode, Nl80211Connection};
//!
//! # fn example() -> nlwifi::Result<()> {
//! let mut nl = Nl80211Connection::new()?;
//! let card = Card::by_name(&mut nl, "wlan0")?;
//!
//! nl.set_mode(&card, InterfaceMode::Monitor)?;
//! for mode in nl.supported_modes(&card)? {
//!     println!("{mode}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Soft blocking a radio
//!
//! ```rust,no_run
//! use nlwifi::rfkill::Rfkill;
//!
//! # fn example() -> nlwifi::Result<()> {
//! let rfkill = Rfkill::new();
//! let index = Rfkill::index_for_phy(0)?;
//! rfkill.block(index)?;
//! assert!(rfkill.soft_blocked(index)?);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod ioctl;
pub mod netlink;
pub mod rfkill;
pub mod util;

#[cfg(feature = "output")]
pub mod output;

pub use error::{Error, ErrorKind, Result};
