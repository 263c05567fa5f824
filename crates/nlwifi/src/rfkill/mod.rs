//! Radio kill switches through `/dev/rfkill`.
//!
//! Opening the device queues an `ADD` event for every switch, followed by
//! `CHANGE` events as states move. Listing reads whatever is queued without
//! blocking; blocking writes a single `CHANGE` request.
//!
//! # Example
//!
//! ```rust,no_run
//! use nlwifi::rfkill::{Rfkill, RfkillType};
//!
//! # fn example() -> nlwifi::Result<()> {
//! let rfkill = Rfkill::new();
//! for switch in rfkill.list()? {
//!     if switch.kind == RfkillType::Wlan && switch.soft {
//!         rfkill.unblock(switch.index)?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod event;

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

pub use event::{RFKILL_EVENT_SIZE, RfkillEvent, RfkillOp, RfkillType};

use crate::error::{Error, Result};

/// Default rfkill device node.
pub const RFKILL_DEVICE: &str = "/dev/rfkill";

const SYS_CLASS_RFKILL: &str = "/sys/class/rfkill";
const SYS_CLASS_IEEE80211: &str = "/sys/class/ieee80211";

/// Handle on an rfkill device node.
///
/// The node is opened per call and closed before returning.
#[derive(Debug, Clone)]
pub struct Rfkill {
    path: PathBuf,
}

impl Default for Rfkill {
    fn default() -> Self {
        Self::new()
    }
}

impl Rfkill {
    /// Use [`RFKILL_DEVICE`].
    pub fn new() -> Self {
        Self::with_path(RFKILL_DEVICE)
    }

    /// Use another device node.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self, write: bool) -> Result<File> {
        OpenOptions::new()
            .read(!write)
            .write(write)
            .custom_flags(libc::O_NONBLOCK | libc::O_CLOEXEC)
            .open(&self.path)
            .map_err(|e| Error::from_io(e, format!("open {}", self.path.display())))
    }

    /// Every event currently queued, in order.
    pub fn events(&self) -> Result<Vec<RfkillEvent>> {
        let mut file = self.open(false)?;
        let mut events = Vec::new();
        let mut buf = [0u8; RFKILL_EVENT_SIZE];

        loop {
            match file.read(&mut buf) {
                Ok(0) => break,
                Ok(n) if n < RFKILL_EVENT_SIZE => {
                    return Err(Error::Truncated {
                        expected: RFKILL_EVENT_SIZE,
                        actual: n,
                    });
                }
                Ok(_) => events.push(RfkillEvent::from_bytes(&buf)?),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::from_io(e, "read rfkill events")),
            }
        }

        tracing::trace!(count = events.len(), "read rfkill events");
        Ok(events)
    }

    /// Current state of every switch, ordered by index.
    pub fn list(&self) -> Result<Vec<RfkillEvent>> {
        let mut switches = BTreeMap::new();
        for event in self.events()? {
            match event.op {
                RfkillOp::Add => {
                    switches.insert(event.index, event);
                }
                RfkillOp::Change => {
                    switches
                        .entry(event.index)
                        .and_modify(|known: &mut RfkillEvent| {
                            known.soft = event.soft;
                            known.hard = event.hard;
                        })
                        .or_insert(event);
                }
                RfkillOp::Del => {
                    switches.remove(&event.index);
                }
                RfkillOp::ChangeAll | RfkillOp::Unknown(_) => {}
            }
        }
        Ok(switches.into_values().collect())
    }

    /// State of one switch.
    pub fn get(&self, index: u32) -> Result<RfkillEvent> {
        self.list()?
            .into_iter()
            .find(|switch| switch.index == index)
            .ok_or(Error::RfkillNotFound { index })
    }

    pub fn soft_blocked(&self, index: u32) -> Result<bool> {
        Ok(self.get(index)?.soft)
    }

    pub fn hard_blocked(&self, index: u32) -> Result<bool> {
        Ok(self.get(index)?.hard)
    }

    fn write(&self, event: &RfkillEvent) -> Result<()> {
        let mut file = self.open(true)?;
        file.write_all(&event.to_bytes())
            .map_err(|e| Error::from_io(e, "write rfkill event"))
    }

    /// Set or clear the soft block of one switch.
    pub fn set_blocked(&self, index: u32, blocked: bool) -> Result<()> {
        tracing::debug!(index, blocked, "rfkill change");
        self.write(&RfkillEvent::change(index, blocked))
    }

    /// Soft block one switch.
    pub fn block(&self, index: u32) -> Result<()> {
        self.set_blocked(index, true)
    }

    /// Clear the soft block of one switch.
    pub fn unblock(&self, index: u32) -> Result<()> {
        self.set_blocked(index, false)
    }

    /// Set or clear the soft block of every switch of `kind`.
    pub fn block_all(&self, kind: RfkillType, blocked: bool) -> Result<()> {
        tracing::debug!(%kind, blocked, "rfkill change all");
        self.write(&RfkillEvent::change_all(kind, blocked))
    }

    /// rfkill index of a wireless phy.
    pub fn index_for_phy(phy: u32) -> Result<u32> {
        let dir = Path::new(SYS_CLASS_IEEE80211).join(format!("phy{phy}"));
        index_in(&dir)?.ok_or(Error::PhyNotFound { phy })
    }

    /// Name of a switch, such as `phy0` or `hci0`.
    pub fn name(index: u32) -> Result<String> {
        let path = Path::new(SYS_CLASS_RFKILL)
            .join(format!("rfkill{index}"))
            .join("name");
        match fs::read_to_string(&path) {
            Ok(name) => Ok(name.trim_end().to_string()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::RfkillNotFound { index }),
            Err(e) => Err(Error::from_io(e, format!("read {}", path.display()))),
        }
    }
}

/// Find the `rfkill<N>` entry of a sysfs device directory.
fn index_in(dir: &Path) -> Result<Option<u32>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::from_io(e, format!("read {}", dir.display()))),
    };
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        if let Some(index) = name
            .to_str()
            .and_then(|n| n.strip_prefix("rfkill"))
            .and_then(|n| n.parse().ok())
        {
            return Ok(Some(index));
        }
    }
    Ok(None)
}
