//! Ioctl integration tests on dummy interfaces.

use nlwifi::Result;
use nlwifi::ioctl::{Ipv4Config, IoctlSocket};
use nlwifi::util::MacAddr;
use std::net::Ipv4Addr;

use crate::common::TestDummy;

#[test]
fn test_missing_interface() -> Result<()> {
    let sock = IoctlSocket::new()?;

    let err = sock.hw_addr("nlwnothere0").unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err}");
    let err = sock.set_up("nlwnothere0", true).unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err}");

    Ok(())
}

#[test]
fn test_link_up_down() -> Result<()> {
    require_root!();

    let dummy = TestDummy::new()?;
    let sock = IoctlSocket::new()?;

    assert!(!sock.is_up(dummy.name())?);
    sock.set_up(dummy.name(), true)?;
    assert!(sock.is_up(dummy.name())?);
    sock.set_up(dummy.name(), false)?;
    assert!(!sock.is_up(dummy.name())?);

    Ok(())
}

#[test]
fn test_hw_addr_round_trip() -> Result<()> {
    require_root!();

    let dummy = TestDummy::new()?;
    let sock = IoctlSocket::new()?;

    let mac: MacAddr = "02:00:00:aa:bb:cc".parse()?;
    sock.set_hw_addr(dummy.name(), mac)?;
    assert_eq!(sock.hw_addr(dummy.name())?, mac);

    Ok(())
}

#[test]
fn test_ipv4_round_trip() -> Result<()> {
    require_root!();

    let dummy = TestDummy::new()?;
    let sock = IoctlSocket::new()?;

    assert_eq!(sock.ipv4(dummy.name())?.address, None);

    let config = Ipv4Config::new(Ipv4Addr::new(10, 254, 0, 2), Ipv4Addr::new(255, 255, 255, 0))
        .with_broadcast(Ipv4Addr::new(10, 254, 0, 255));
    sock.set_ipv4(dummy.name(), &config)?;

    let read = sock.ipv4(dummy.name())?;
    assert_eq!(read.address, config.address);
    assert_eq!(read.prefix_len(), Some(24));
    assert_eq!(read.broadcast, config.broadcast);

    Ok(())
}
