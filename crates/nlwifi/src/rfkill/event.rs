//! The rfkill event record.
//!
//! ```text
//! struct rfkill_event {
//!     __u32 idx;    // native byte order
//!     __u8  type;
//!     __u8  op;
//!     __u8  soft;
//!     __u8  hard;
//! };                // 8 bytes, no padding
//! ```
//!
//! Newer kernels append fields; reads ask for exactly this size and the
//! kernel truncates accordingly.

use std::fmt;

use crate::error::{Error, Result};

/// Size of a version 1 `struct rfkill_event`.
pub const RFKILL_EVENT_SIZE: usize = 8;

/// Radio technology of an rfkill switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RfkillType {
    /// Every type; only meaningful in `CHANGE_ALL` requests.
    All,
    Wlan,
    Bluetooth,
    Uwb,
    Wimax,
    Wwan,
    Gps,
    Fm,
    Nfc,
    Unknown(u8),
}

impl RfkillType {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::All,
            1 => Self::Wlan,
            2 => Self::Bluetooth,
            3 => Self::Uwb,
            4 => Self::Wimax,
            5 => Self::Wwan,
            6 => Self::Gps,
            7 => Self::Fm,
            8 => Self::Nfc,
            other => Self::Unknown(other),
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            Self::All => 0,
            Self::Wlan => 1,
            Self::Bluetooth => 2,
            Self::Uwb => 3,
            Self::Wimax => 4,
            Self::Wwan => 5,
            Self::Gps => 6,
            Self::Fm => 7,
            Self::Nfc => 8,
            Self::Unknown(value) => value,
        }
    }
}

impl fmt::Display for RfkillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Wlan => f.write_str("wlan"),
            Self::Bluetooth => f.write_str("bluetooth"),
            Self::Uwb => f.write_str("uwb"),
            Self::Wimax => f.write_str("wimax"),
            Self::Wwan => f.write_str("wwan"),
            Self::Gps => f.write_str("gps"),
            Self::Fm => f.write_str("fm"),
            Self::Nfc => f.write_str("nfc"),
            Self::Unknown(value) => write!(f, "unknown({value})"),
        }
    }
}

impl std::str::FromStr for RfkillType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "all" => Self::All,
            "wlan" | "wifi" => Self::Wlan,
            "bluetooth" => Self::Bluetooth,
            "uwb" | "ultrawideband" => Self::Uwb,
            "wimax" => Self::Wimax,
            "wwan" => Self::Wwan,
            "gps" => Self::Gps,
            "fm" => Self::Fm,
            "nfc" => Self::Nfc,
            _ => {
                return Err(Error::InvalidArgument(format!("unknown rfkill type: {s}")));
            }
        })
    }
}

/// What an event reports or requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RfkillOp {
    /// A switch appeared (also sent for every switch on open).
    Add,
    /// A switch disappeared.
    Del,
    /// The state of one switch changed.
    Change,
    /// Change every switch of a type.
    ChangeAll,
    Unknown(u8),
}

impl RfkillOp {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Add,
            1 => Self::Del,
            2 => Self::Change,
            3 => Self::ChangeAll,
            other => Self::Unknown(other),
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            Self::Add => 0,
            Self::Del => 1,
            Self::Change => 2,
            Self::ChangeAll => 3,
            Self::Unknown(value) => value,
        }
    }
}

/// One rfkill event record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RfkillEvent {
    /// Switch index (`rfkill<idx>` in sysfs).
    pub index: u32,
    pub kind: RfkillType,
    pub op: RfkillOp,
    /// Blocked by software.
    pub soft: bool,
    /// Blocked by a hardware switch; read-only.
    pub hard: bool,
}

impl RfkillEvent {
    /// Request to change the soft state of one switch.
    pub fn change(index: u32, soft: bool) -> Self {
        Self {
            index,
            kind: RfkillType::All,
            op: RfkillOp::Change,
            soft,
            hard: false,
        }
    }

    /// Request to change the soft state of every switch of `kind`.
    pub fn change_all(kind: RfkillType, soft: bool) -> Self {
        Self {
            index: 0,
            kind,
            op: RfkillOp::ChangeAll,
            soft,
            hard: false,
        }
    }

    /// Decode a record; extra trailing bytes are ignored.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let Some(&[a, b, c, d, kind, op, soft, hard]) = data.first_chunk::<RFKILL_EVENT_SIZE>()
        else {
            return Err(Error::Truncated {
                expected: RFKILL_EVENT_SIZE,
                actual: data.len(),
            });
        };
        Ok(Self {
            index: u32::from_ne_bytes([a, b, c, d]),
            kind: RfkillType::from_u8(kind),
            op: RfkillOp::from_u8(op),
            soft: soft != 0,
            hard: hard != 0,
        })
    }

    pub fn to_bytes(&self) -> [u8; RFKILL_EVENT_SIZE] {
        let mut buf = [0u8; RFKILL_EVENT_SIZE];
        buf[..4].copy_from_slice(&self.index.to_ne_bytes());
        buf[4] = self.kind.as_u8();
        buf[5] = self.op.as_u8();
        buf[6] = self.soft as u8;
        buf[7] = self.hard as u8;
        buf
    }

    /// Blocked by either switch.
    pub fn is_blocked(&self) -> bool {
        self.soft || self.hard
    }
}
