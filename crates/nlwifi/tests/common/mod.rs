//! Common test utilities for integration tests.
//!
//! Provides `TestDummy`, a throwaway dummy interface for ioctl tests,
//! and helper macros for conditional test execution.

use nlwifi::Result;
use nlwifi::netlink::Card;
use nlwifi::netlink::genl::nl80211::Nl80211Connection;
use std::io;
use std::process::Command;
use std::sync::atomic::{AtomicU32, Ordering};

/// Global counter for unique interface names.
static DUMMY_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Generate a unique interface name that fits in IFNAMSIZ.
fn unique_dummy_name() -> String {
    let id = DUMMY_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("nlw{}d{}", std::process::id() % 100_000, id)
}

/// Run `ip` with the given arguments.
fn ip(args: &[&str]) -> Result<()> {
    let status = Command::new("ip")
        .args(args)
        .status()
        .map_err(|e| nlwifi::Error::Io(io::Error::from(e.kind())))?;

    if !status.success() {
        return Err(nlwifi::Error::InvalidMessage(format!(
            "ip {} failed",
            args.join(" ")
        )));
    }
    Ok(())
}

/// A dummy interface deleted on drop.
pub struct TestDummy {
    name: String,
}

impl TestDummy {
    pub fn new() -> Result<Self> {
        let name = unique_dummy_name();
        ip(&["link", "add", &name, "type", "dummy"])?;
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for TestDummy {
    fn drop(&mut self) {
        let _ = Command::new("ip")
            .args(["link", "del", &self.name])
            .output();
    }
}

/// Check if running as root.
pub fn is_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}

/// First wireless card, if the kernel has nl80211 and a wireless interface.
///
/// `modprobe mac80211_hwsim radios=2` gives a machine without hardware
/// something to test against.
pub fn first_card() -> Option<(Nl80211Connection, Card)> {
    let mut nl = Nl80211Connection::new().ok()?;
    let card = nl.cards().ok()?.into_iter().next()?;
    Some((nl, card))
}

/// Skip the test if not running as root.
#[macro_export]
macro_rules! require_root {
    () => {
        if !crate::common::is_root() {
            eprintln!("Skipping test: requires root");
            return Ok(());
        }
    };
}

/// Bind the first wireless card or skip the test.
#[macro_export]
macro_rules! require_card {
    ($nl:ident, $card:ident) => {
        let Some((mut $nl, $card)) = crate::common::first_card() else {
            eprintln!("Skipping test: no wireless card");
            return Ok(());
        };
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_dummy_name() {
        let name1 = unique_dummy_name();
        let name2 = unique_dummy_name();
        assert_ne!(name1, name2);
        assert!(name1.len() < nlwifi::util::IFNAMSIZ);
    }
}
